//! Language tags for fenced code blocks.

use std::path::Path;

/// Maps a file extension to a fenced-code language tag.
///
/// Returns `None` for extensions we don't recognize.
pub fn extension_to_language(ext: &str) -> Option<&'static str> {
    let lang = match ext.to_ascii_lowercase().as_str() {
        // Systems programming
        "rs" => "rust",
        "c" | "h" => "c",
        "cpp" | "cc" | "cxx" | "hpp" | "hxx" | "hh" => "cpp",
        "go" => "go",
        "zig" => "zig",

        // Dynamic/scripting
        "py" | "pyi" | "pyw" => "python",
        "rb" | "rake" | "gemspec" => "ruby",
        "php" => "php",
        "lua" => "lua",
        "pl" | "pm" => "perl",
        "sh" | "bash" | "zsh" => "bash",
        "ps1" | "psm1" => "powershell",

        // JVM / .NET
        "java" => "java",
        "kt" | "kts" => "kotlin",
        "scala" | "sc" => "scala",
        "groovy" | "gradle" => "groovy",
        "cs" => "csharp",
        "fs" | "fsx" => "fsharp",

        // Web
        "js" | "mjs" | "cjs" => "javascript",
        "jsx" => "jsx",
        "ts" | "mts" | "cts" => "typescript",
        "tsx" => "tsx",
        "vue" => "vue",
        "svelte" => "svelte",
        "html" | "htm" => "html",
        "css" => "css",
        "scss" | "sass" => "scss",

        // Mobile
        "swift" => "swift",
        "m" | "mm" => "objectivec",
        "dart" => "dart",

        // Functional
        "hs" => "haskell",
        "ex" | "exs" => "elixir",
        "erl" => "erlang",
        "clj" | "cljs" => "clojure",
        "ml" | "mli" => "ocaml",

        // Data/Config
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "sql" => "sql",
        "graphql" | "gql" => "graphql",
        "proto" => "protobuf",
        "tf" | "hcl" => "hcl",
        "md" | "mdx" => "markdown",
        "sol" => "solidity",

        _ => return None,
    };
    Some(lang)
}

/// Maps an extensionless file name to a language tag.
fn filename_to_language(name: &str) -> Option<&'static str> {
    match name {
        "Dockerfile" | "Containerfile" => Some("dockerfile"),
        "Makefile" | "makefile" | "GNUmakefile" => Some("makefile"),
        "Rakefile" | "Gemfile" | "Vagrantfile" => Some("ruby"),
        "Jenkinsfile" => Some("groovy"),
        _ => None,
    }
}

/// Normalizes a user-supplied hint: canonical names pass through, common
/// extensions ("rs", "ts") are expanded.
pub fn normalize_language_hint(hint: &str) -> Option<String> {
    let hint = hint.trim().trim_start_matches('.').to_ascii_lowercase();
    if hint.is_empty() {
        return None;
    }
    if let Some(lang) = extension_to_language(&hint) {
        return Some(lang.to_string());
    }
    // Fence tags must stay on one line and free of backticks.
    if hint
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '#' | '-' | '_'))
    {
        return Some(hint);
    }
    None
}

/// Language tag to put on the fenced block: the explicit hint wins, then the
/// file name.
pub fn fence_language(language: Option<&str>, filename: Option<&str>) -> Option<String> {
    if let Some(lang) = language.and_then(normalize_language_hint) {
        return Some(lang);
    }

    let path = Path::new(filename?);
    if let Some(lang) = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(filename_to_language)
    {
        return Some(lang.to_string());
    }
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(extension_to_language)
        .map(String::from)
}

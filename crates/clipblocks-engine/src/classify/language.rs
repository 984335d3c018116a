//! Language names: alias normalisation for fence hints and signature
//! scoring for unlabelled code.

use std::sync::OnceLock;

use regex::Regex;

/// `(alias, canonical)`, matched after lowercasing.
const ALIASES: &[(&str, &str)] = &[
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("node", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("py", "python"),
    ("py3", "python"),
    ("python3", "python"),
    ("rs", "rust"),
    ("sh", "shell"),
    ("bash", "shell"),
    ("zsh", "shell"),
    ("console", "shell"),
    ("shellscript", "shell"),
    ("cpp", "c++"),
    ("cxx", "c++"),
    ("cc", "c++"),
    ("hpp", "c++"),
    ("cs", "c#"),
    ("csharp", "c#"),
    ("golang", "go"),
    ("rb", "ruby"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("kt", "kotlin"),
    ("objc", "objective-c"),
    ("ps1", "powershell"),
    ("pwsh", "powershell"),
    ("dockerfile", "docker"),
    ("tex", "latex"),
    ("htm", "html"),
    ("text", "plain text"),
    ("txt", "plain text"),
    ("plain", "plain text"),
    ("plaintext", "plain text"),
];

/// Canonical name for a fence hint; unknown hints pass through lowercased.
pub fn normalize(hint: &str) -> String {
    let lower = hint.trim().to_lowercase();
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lower)
}

/// Per-language signature patterns, in tie-break order.
const SIGNATURES: &[(&str, &[&str])] = &[
    (
        "rust",
        &[
            r"\bfn\s+\w+\s*[(<]",
            r"\blet\s+mut\b",
            r"\bimpl\b.*\{",
            r"\bpub\s+(fn|struct|enum|mod)\b",
            r"\w+!\(",
            r"^\s*use\s+\w+(::\w+)+",
            r"->\s*(Self|Result|Option|\w+)\s*\{?",
        ],
    ),
    (
        "typescript",
        &[
            r"^\s*(export\s+)?interface\s+\w+",
            r":\s*(string|number|boolean|void|any)\b",
            r"^\s*type\s+\w+\s*=",
            r"^\s*export\s+(const|function|class|default)\b",
        ],
    ),
    (
        "javascript",
        &[
            r"\bfunction\b\s*\w*\s*\(",
            r"^\s*(const|let|var)\s+\w+\s*=",
            r"=>",
            r"\bconsole\.log\(",
            r"\brequire\(",
            r"\bdocument\.",
        ],
    ),
    (
        "python",
        &[
            r"^\s*def\s+\w+\s*\(.*\)\s*(->\s*[\w\[\], ]+)?:\s*$",
            r"^\s*(import\s+\w+|from\s+[\w.]+\s+import\b)",
            r"\bself\.",
            r"^\s*(elif|except|finally)\b.*:\s*$",
            r"\bprint\(",
            r"^\s*class\s+\w+(\(.*\))?:\s*$",
        ],
    ),
    (
        "java",
        &[
            r"\bpublic\s+(static\s+)?(class|void|final)\b",
            r"\bSystem\.out\.",
            r"@Override",
            r"\bprivate\s+\w+(<.*>)?\s+\w+\s*[;=]",
        ],
    ),
    (
        "c++",
        &[
            r"#include\s*<(iostream|vector|string|map|memory)>",
            r"\bstd::",
            r"\bcout\s*<<",
            r"\btemplate\s*<",
            r"\bnamespace\s+\w+",
        ],
    ),
    (
        "c",
        &[
            r"#include\s*<\w+\.h>",
            r"\bprintf\(",
            r"\bint\s+main\s*\(",
            r"\bmalloc\(",
        ],
    ),
    (
        "go",
        &[
            r"^\s*package\s+\w+\s*$",
            r"\bfunc\s+(\(\w+\s+\*?\w+\)\s*)?\w+\(",
            r"\bfmt\.",
            r":=",
        ],
    ),
    (
        "ruby",
        &[
            r"^\s*def\s+\w+[?!]?\s*$",
            r"^\s*end\s*$",
            r"\bputs\s",
            r"\.each\s+do\b",
            r"^\s*require\s+'",
        ],
    ),
    (
        "php",
        &[r"<\?php", r"\$\w+\s*=", r"\becho\s", r"\bfunction\s+\w+\s*\(\$"],
    ),
    (
        "sql",
        &[
            r"(?i)^\s*select\b.+\bfrom\b",
            r"(?i)^\s*insert\s+into\b",
            r"(?i)^\s*create\s+table\b",
            r"(?i)^\s*(update\s+\w+\s+set|delete\s+from)\b",
            r"(?i)\bwhere\b.+=",
        ],
    ),
    (
        "shell",
        &[
            r"^#!/(usr/)?bin/(env\s+)?(ba|z)?sh",
            r"^\s*\$\s+\w+",
            r"\b(sudo|apt-get|brew|chmod|grep|curl|echo)\s",
            r"^\s*export\s+\w+=",
            r"\|\s*(grep|awk|sed|xargs)\b",
        ],
    ),
    (
        "css",
        &[
            r"^\s*[.#]?[\w-]+(\s*[,>+~]?\s*[.#]?[\w-]+)*\s*\{\s*$",
            r"^\s*[\w-]+\s*:\s*[^;]+;\s*$",
            r"@media\b",
        ],
    ),
];

type Compiled = Vec<(&'static str, Vec<Regex>)>;

fn compiled() -> &'static Compiled {
    static COMPILED: OnceLock<Compiled> = OnceLock::new();
    COMPILED.get_or_init(|| {
        SIGNATURES
            .iter()
            .map(|(name, patterns)| {
                let regexes = patterns
                    .iter()
                    .map(|p| Regex::new(&format!("(?m){p}")).expect("Invalid language signature regex"))
                    .collect();
                (*name, regexes)
            })
            .collect()
    })
}

/// Best-scoring language, `None` when no signature matches at all.
pub fn detect(code: &str) -> Option<&'static str> {
    let mut best: Option<(&'static str, usize)> = None;
    for (name, regexes) in compiled() {
        let score = regexes.iter().filter(|r| r.is_match(code)).count();
        if score > 0 && best.is_none_or(|(_, top)| score > top) {
            best = Some((name, score));
        }
    }
    best.map(|(name, _)| name)
}

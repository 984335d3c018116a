// Input generators shared by the bench targets. Each target compiles this
// file as its own module and uses only some of them, hence the allows.
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **some** content.\n\n- Bullet point\n  - Nested item\n- [x] Another item\n\n> [!tip] Remember this\n\n> Toggle\n  hidden body\n\n| a | b |\n| --- | --- |\n| 1 | 2 |\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n";
    base.repeat(size)
}

/// Roughly `bytes` long.
#[allow(dead_code)]
pub fn generate_megabyte_markdown(bytes: usize) -> String {
    let one = generate_markdown_content(1);
    generate_markdown_content(bytes / one.len() + 1)
}

#[allow(dead_code)]
pub fn generate_csv(rows: usize) -> String {
    let mut content = String::from("id,name,score\n");
    for i in 0..rows {
        content.push_str(&format!("{i},name {i},{}\n", i * 7 % 100));
    }
    content
}

#[allow(dead_code)]
pub fn generate_code(functions: usize) -> String {
    let mut content = String::new();
    for i in 0..functions {
        content.push_str(&format!(
            "fn handler_{i}(input: &str) -> usize {{\n    let trimmed = input.trim();\n    trimmed.len() + {i}\n}}\n\n"
        ));
    }
    content
}

/// Greedy word wrap where a line may hold roughly `width / (font_size * 0.6)`
/// characters. A single word longer than the budget keeps its own line.
pub fn wrap_label(text: &str, width: f32, font_size: f32) -> Vec<String> {
    let max_chars = (width / (font_size * 0.6)).floor().max(1.0) as usize;

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };

        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

pub fn display_reference(sambandsnummer: &str) -> &str {
    if sambandsnummer.is_empty() {
        "N/A"
    } else {
        sambandsnummer
    }
}

/// Reformats phone input as the user types: keeps digits only and renders them as
/// `(555`, `(555) 123`, `(555) 123-4567`. Digits past the tenth are dropped.
pub fn format_phone_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => {
            let end = digits.len().min(10);
            format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..end])
        }
    }
}

pub mod address;
pub mod engine;
pub mod phone;
pub mod send_gate;

/// Case-insensitive trimmed form used wherever names are compared.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Book codes are compared in trimmed uppercase form.
pub fn normalize_book_code(book: &str) -> String {
    book.trim().to_uppercase()
}

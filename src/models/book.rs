use serde::{Deserialize, Serialize};

use crate::utils::urls::resolve_resource_url;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    /// Total copies owned
    pub quantity: u32,
    /// Copies currently loanable, never above `quantity`
    pub available_quantity: u32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_image_url: Option<String>,
}

impl Book {
    pub fn is_available(&self) -> bool {
        self.available_quantity > 0
    }
}

// DTO as received from the API
#[derive(Debug, Deserialize)]
pub struct BookWire {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub available_quantity: u32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_image_url: Option<String>,
}

impl BookWire {
    pub fn into_book(self, base_url: &str) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            isbn: self.isbn,
            quantity: self.quantity,
            // Guard the 0 <= available <= quantity invariant against stale counters
            available_quantity: self.available_quantity.min(self.quantity),
            description: self.description,
            category: self.category,
            cover_image_url: resolve_resource_url(base_url, self.cover_image_url.as_deref()),
        }
    }
}

/// Form data for creating or updating a book.
///
/// The server manages `available_quantity`; it is never sent.
#[derive(Debug, Clone, Default)]
pub struct BookForm {
    pub title: String,
    pub author: String,
    pub isbn: String,
    pub quantity: u32,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cover_image: Option<FileUpload>,
}

/// File picked in a form: a book cover or a profile picture.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl BookForm {
    /// Text fields in the order the form sends them, skipping empty optionals.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("title", self.title.clone()),
            ("author", self.author.clone()),
            ("isbn", self.isbn.clone()),
            ("quantity", self.quantity.to_string()),
        ];
        if let Some(description) = &self.description {
            fields.push(("description", description.clone()));
        }
        if let Some(category) = &self.category {
            fields.push(("category", category.clone()));
        }
        fields
    }

    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            isbn: book.isbn.clone(),
            quantity: book.quantity,
            description: book.description.clone(),
            category: book.category.clone(),
            cover_image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_conversion_resolves_cover_and_renames() {
        let wire: BookWire = serde_json::from_value(serde_json::json!({
            "id": 4,
            "title": "Things Fall Apart",
            "author": "Chinua Achebe",
            "isbn": "9780385474542",
            "quantity": 3,
            "available_quantity": 1,
            "cover_image_url": "static/covers/4.jpg"
        }))
        .unwrap();
        let book = wire.into_book("https://api.example.org");
        assert_eq!(book.available_quantity, 1);
        assert_eq!(
            book.cover_image_url.as_deref(),
            Some("https://api.example.org/static/covers/4.jpg")
        );
        assert!(book.is_available());
        assert_eq!(book.category, None);
    }

    #[test]
    fn form_skips_missing_optionals() {
        let form = BookForm {
            title: "T".into(),
            author: "A".into(),
            isbn: "1".into(),
            quantity: 2,
            ..Default::default()
        };
        let names: Vec<_> = form.text_fields().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["title", "author", "isbn", "quantity"]);
    }
}

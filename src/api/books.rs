use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::{ApiClient, RequestBody};
use crate::domain::ClientError;
use crate::models::book::BookWire;
use crate::models::{ActionReceipt, Book, BookForm};

impl ApiClient {
    pub async fn get_books(&self) -> Result<Vec<Book>, ClientError> {
        let books: Vec<BookWire> = self.get_list("/books/").await?;
        tracing::debug!("Fetched {} books", books.len());
        Ok(books
            .into_iter()
            .map(|b| b.into_book(self.base_url()))
            .collect())
    }

    pub async fn get_book(&self, id: i64) -> Result<Book, ClientError> {
        let wire: BookWire = self.get_json(&format!("/books/{}", id)).await?;
        Ok(wire.into_book(self.base_url()))
    }

    pub async fn create_book(&self, form: &BookForm) -> Result<Book, ClientError> {
        let wire: BookWire = self
            .send(Method::POST, "/books/", RequestBody::Multipart(book_multipart(form)?))
            .await?
            .into_json()?;
        tracing::info!("Created book {} ({})", wire.id, wire.title);
        Ok(wire.into_book(self.base_url()))
    }

    pub async fn update_book(&self, id: i64, form: &BookForm) -> Result<Book, ClientError> {
        let wire: BookWire = self
            .send(
                Method::PUT,
                &format!("/books/{}", id),
                RequestBody::Multipart(book_multipart(form)?),
            )
            .await?
            .into_json()?;
        Ok(wire.into_book(self.base_url()))
    }

    pub async fn delete_book(&self, id: i64) -> Result<ActionReceipt, ClientError> {
        tracing::info!("Deleting book {}", id);
        self.send(Method::DELETE, &format!("/books/{}", id), RequestBody::None)
            .await?
            .into_receipt()
    }

    /// Reserve the next copy of an unavailable book
    pub async fn place_hold(&self, book_id: i64) -> Result<ActionReceipt, ClientError> {
        self.post_action(&format!("/books/{}/hold", book_id), RequestBody::None)
            .await
    }
}

fn book_multipart(form: &BookForm) -> Result<Form, ClientError> {
    let mut multipart = Form::new();
    for (name, value) in form.text_fields() {
        multipart = multipart.text(name, value);
    }

    if let Some(cover) = &form.cover_image {
        let part = Part::bytes(cover.bytes.clone())
            .file_name(cover.file_name.clone())
            .mime_str(&cover.mime_type)
            .map_err(|e| ClientError::Validation(format!("Invalid cover image type: {}", e)))?;
        multipart = multipart.part("cover_image", part);
    }

    Ok(multipart)
}

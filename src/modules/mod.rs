pub mod qr;
pub mod scanner;

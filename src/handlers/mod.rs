// src/handlers/mod.rs
pub mod openai; // ✍️ Text generation endpoints
pub mod youtube; // 📺 YouTube metadata endpoints

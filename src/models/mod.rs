pub mod battery;
pub mod gemini;
pub mod marketplace;
pub mod openai;

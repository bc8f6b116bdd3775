pub mod meme;
pub mod range;
pub mod refresh;
pub mod server;
pub mod settings;
pub mod solana;
pub mod sources;

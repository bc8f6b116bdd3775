pub mod network;
pub mod price;
pub mod state;
pub mod stream;
pub mod token;
pub mod wallet;
pub mod window;

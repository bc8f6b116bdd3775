pub const PORT: u16 = 8080;
pub const ASSET_ROOT: &str = ".";

pub const BLACKPAPER_FILE: &str = "Blackpaper.pdf";
pub const BLACKPAPER_DOWNLOAD_NAME: &str = "Solana_Moon_Blackpaper.pdf";
// Tried in order, relative to the asset root.
pub const BLACKPAPER_PATHS: [&str; 5] = [
    "./src/assets/Blackpaper.pdf",
    "src/assets/Blackpaper.pdf",
    "./assets/Blackpaper.pdf",
    "../assets/Blackpaper.pdf",
    "/src/assets/Blackpaper.pdf",
];

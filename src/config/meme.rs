pub const TICKER_PREFIXES: [&str; 10] = [
    "MOON", "PEPE", "DOGE", "CHAD", "BASED", "SIGMA", "ALPHA", "BULL", "BEAR", "APE",
];
pub const TICKER_SUFFIXES: [&str; 10] = [
    "X", "INU", "COIN", "TOKEN", "2024", "100X", "MOON", "MARS", "PLUTO", "GALAXY",
];

pub const NAME_ADJECTIVES: [&str; 8] = [
    "LEGENDARY", "EPIC", "ULTIMATE", "SUPREME", "MEGA", "ULTRA", "SUPER", "HYPER",
];
pub const NAME_NOUNS: [&str; 8] = [
    "MOONSHOT", "ROCKET", "DIAMOND", "GOLDEN", "PLATINUM", "COSMIC", "GALACTIC", "QUANTUM",
];
pub const NAME_ENDINGS: [&str; 8] = [
    "PROTOCOL", "NETWORK", "ECOSYSTEM", "FINANCE", "DEFI", "TOKEN", "COIN", "PROJECT",
];

pub const TRENDING_NAMES: [&str; 5] = [
    "VIRAL MEME MACHINE",
    "TRENDING BEAST MODE",
    "SOCIAL MEDIA KING",
    "INFLUENCER TOKEN",
    "HYPE TRAIN EXPRESS",
];

pub const DEX_NAMES: [&str; 12] = [
    "SOLANA SPEED DEMON",
    "DEX MASTER CHIEF",
    "LIQUIDITY LEGEND",
    "SWAP KING KONG",
    "AMM ATOMIC BOMB",
    "YIELD FARMER PRO",
    "FLASH LOAN FLASH",
    "ARBITRAGE ALPHA",
    "WHALE HUNTER X",
    "SLIPPAGE SLAYER",
    "GAS FEE GOBLIN",
    "MEV BOT KILLER",
];

pub const LAUNCH_NAMES: [&str; 20] = [
    "PEPE PRESIDENT 2024",
    "MOON LAMBO ROCKET",
    "DIAMOND HANDS FOREVER",
    "HODL TILL VALHALLA",
    "DOGE TO ANDROMEDA",
    "WEN MOON CAPTAIN",
    "CHAD THUNDER BULL",
    "GIGACHAD TOKEN",
    "BASED APE SOCIETY",
    "SIGMA GRINDSET COIN",
    "TENDIES INCOMING",
    "PUMP MY BAGS",
    "REKT RECOVERY FUND",
    "FOMO KING SUPREME",
    "YOLO SWAG MONEY",
    "NUMBER GO UP ONLY",
    "LINE GOES BRRRRR",
    "MONEY PRINTER GO",
    "STONKS TO JUPITER",
    "GAINS GOBLIN GANG",
];

use configparser::ini::Ini;
use log::{info, warn};
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Mutex;

use crate::lottery::quota::MAX_ROUND_SIZE;
use crate::lottery::scene::TABLE_ROWS;
use crate::ui::color;

// Window
pub const WINDOW_TITLE: &str = "LuckyStage";

const CONFIG_INI_PATH: &str = "luckystage.ini";

/// Fewest cards per row that still leave a free card for every winner of a
/// full round.
pub const MIN_ROW_COUNT: usize = MAX_ROUND_SIZE.div_ceil(TABLE_ROWS);

// Theme defaults
const DEFAULT_CARD_COLOR: [f32; 4] = [1.0, 121.0 / 255.0, 198.0 / 255.0, 1.0]; // #ff79c6
const DEFAULT_LUCKY_CARD_COLOR: [f32; 4] = [236.0 / 255.0, 177.0 / 255.0, 172.0 / 255.0, 1.0]; // #ECB1AC
const DEFAULT_PATTERN_COLOR: [f32; 4] = [27.0 / 255.0, 102.0 / 255.0, 201.0 / 255.0, 1.0]; // #1b66c9
const DEFAULT_TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub card_width: f32,
    pub card_height: f32,
    pub text_size: f32,
    pub text_color: [f32; 4],
    pub card_color: [f32; 4],
    pub lucky_card_color: [f32; 4],
    pub pattern_color: [f32; 4],
    /// 1-based slot numbers highlighted in the table layout.
    pub pattern_list: Vec<usize>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            card_width: 140.0,
            card_height: 200.0,
            text_size: 30.0,
            text_color: DEFAULT_TEXT_COLOR,
            card_color: DEFAULT_CARD_COLOR,
            lucky_card_color: DEFAULT_LUCKY_CARD_COLOR,
            pattern_color: DEFAULT_PATTERN_COLOR,
            pattern_list: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Cards per table row; the stage holds `row_count * 7` cards.
    pub row_count: usize,
    pub top_title: String,
    pub display_width: u32,
    pub display_height: u32,
    pub records_path: String,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            row_count: 17,
            top_title: "Lucky Draw".to_string(),
            display_width: 1280,
            display_height: 720,
            records_path: "save/records.json".to_string(),
            theme: Theme::default(),
        }
    }
}

/// Case-sensitive ini where only ';' starts a comment, so '#rrggbb' survives.
pub fn new_ini() -> Ini {
    let mut conf = Ini::new_cs();
    conf.set_comment_symbols(&[';']);
    conf
}

static CONFIG: Lazy<Mutex<Config>> = Lazy::new(|| Mutex::new(Config::default()));

fn create_default_file() -> Result<(), std::io::Error> {
    info!("Config file not found, creating default '{}'.", CONFIG_INI_PATH);
    let d = Config::default();
    let mut conf = new_ini();
    conf.set("Options", "RowCount", Some(d.row_count.to_string()));
    conf.set("Options", "TopTitle", Some(d.top_title));
    conf.set("Options", "DisplayWidth", Some(d.display_width.to_string()));
    conf.set("Options", "DisplayHeight", Some(d.display_height.to_string()));
    conf.set("Options", "RecordsPath", Some(d.records_path));
    conf.set("Theme", "CardWidth", Some(d.theme.card_width.to_string()));
    conf.set("Theme", "CardHeight", Some(d.theme.card_height.to_string()));
    conf.set("Theme", "TextSize", Some(d.theme.text_size.to_string()));
    conf.set("Theme", "TextColor", Some("#ffffff".to_string()));
    conf.set("Theme", "CardColor", Some("#ff79c6".to_string()));
    conf.set("Theme", "LuckyCardColor", Some("#ECB1AC".to_string()));
    conf.set("Theme", "PatternColor", Some("#1b66c9".to_string()));
    conf.set("Theme", "PatternList", Some(String::new()));
    conf.write(CONFIG_INI_PATH)
}

/// "1, 2,3" -> [1, 2, 3]; zeros and junk are dropped.
pub fn parse_pattern_list(s: &str) -> Vec<usize> {
    s.split(',')
        .filter_map(|t| t.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .collect()
}

fn get_parsed<T: std::str::FromStr>(conf: &Ini, section: &str, key: &str, default: T) -> T {
    match conf.get(section, key) {
        Some(v) => v.trim().parse::<T>().unwrap_or_else(|_| {
            warn!("Bad value '{}' for [{}] {}; using default.", v, section, key);
            default
        }),
        None => default,
    }
}

fn get_color(conf: &Ini, key: &str, default: [f32; 4]) -> [f32; 4] {
    conf.get("Theme", key).map_or(default, |v| color::rgba_hex_or(&v, default))
}

fn clamp_row_count(n: usize) -> usize {
    if n < MIN_ROW_COUNT {
        warn!("RowCount {} leaves too few cards for a {}-winner round; using {}.", n, MAX_ROUND_SIZE, MIN_ROW_COUNT);
        return MIN_ROW_COUNT;
    }
    n
}

pub fn from_ini(conf: &Ini) -> Config {
    let d = Config::default();
    Config {
        row_count: clamp_row_count(get_parsed(conf, "Options", "RowCount", d.row_count)),
        top_title: conf.get("Options", "TopTitle").unwrap_or(d.top_title),
        display_width: get_parsed(conf, "Options", "DisplayWidth", d.display_width),
        display_height: get_parsed(conf, "Options", "DisplayHeight", d.display_height),
        records_path: conf.get("Options", "RecordsPath").unwrap_or(d.records_path),
        theme: Theme {
            card_width: get_parsed(conf, "Theme", "CardWidth", d.theme.card_width),
            card_height: get_parsed(conf, "Theme", "CardHeight", d.theme.card_height),
            text_size: get_parsed(conf, "Theme", "TextSize", d.theme.text_size),
            text_color: get_color(conf, "TextColor", d.theme.text_color),
            card_color: get_color(conf, "CardColor", d.theme.card_color),
            lucky_card_color: get_color(conf, "LuckyCardColor", d.theme.lucky_card_color),
            pattern_color: get_color(conf, "PatternColor", d.theme.pattern_color),
            pattern_list: conf.get("Theme", "PatternList").map_or(d.theme.pattern_list, |v| parse_pattern_list(&v)),
        },
    }
}

pub fn load() {
    if !Path::new(CONFIG_INI_PATH).exists() {
        if let Err(e) = create_default_file() {
            warn!("Failed to create default config file: {}", e);
            return;
        }
    }

    let mut conf = new_ini();
    match conf.load(CONFIG_INI_PATH) {
        Ok(_) => {
            let loaded = from_ini(&conf);
            info!(
                "Loaded config: {} cards per row, {}x{} window.",
                loaded.row_count, loaded.display_width, loaded.display_height
            );
            *CONFIG.lock().unwrap_or_else(|e| e.into_inner()) = loaded;
        }
        Err(e) => warn!("Failed to load '{}': {}; using defaults.", CONFIG_INI_PATH, e),
    }
}

/// Returns a copy of the currently loaded config.
pub fn get() -> Config {
    CONFIG.lock().unwrap_or_else(|e| e.into_inner()).clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_list_parsing() {
        assert_eq!(parse_pattern_list("1, 2,3"), vec![1, 2, 3]);
        assert_eq!(parse_pattern_list("0,x,,5"), vec![5]);
        assert!(parse_pattern_list("").is_empty());
    }

    #[test]
    fn reads_values_and_keeps_defaults() {
        let mut conf = new_ini();
        conf.read(
            "[Options]\nRowCount=5\nTopTitle=Year End\n[Theme]\nCardWidth=100\nCardColor=#000000\nPatternList=2,4\nTextSize=oops\n"
                .to_string(),
        )
        .unwrap();
        let c = from_ini(&conf);
        assert_eq!(c.row_count, 5);
        assert_eq!(c.top_title, "Year End");
        assert_eq!(c.theme.card_width, 100.0);
        assert_eq!(c.theme.card_height, 200.0);
        assert_eq!(c.theme.text_size, 30.0);
        assert_eq!(c.theme.card_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(c.theme.pattern_list, vec![2, 4]);
        assert_eq!(c.display_width, 1280);
    }

    #[test]
    fn small_row_counts_are_raised() {
        for n in ["0", "1"] {
            let mut conf = new_ini();
            conf.read(format!("[Options]\nRowCount={}\n", n)).unwrap();
            let c = from_ini(&conf);
            assert_eq!(c.row_count, 2);
            assert!(c.row_count * TABLE_ROWS >= MAX_ROUND_SIZE);
        }
        let mut conf = new_ini();
        conf.read("[Options]\nRowCount=2\n".to_string()).unwrap();
        assert_eq!(from_ini(&conf).row_count, 2);
    }
}

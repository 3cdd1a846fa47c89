use std::path::PathBuf;

use rocket::serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default)]
    pub io_tmp_dir: Option<String>,
    #[serde(default = "default_io_file_prefix")]
    pub io_file_prefix: String,
    #[serde(default)]
    pub allow_shutdown: bool,
}

fn default_io_file_prefix() -> String {
    "workbench_io_".into()
}

impl Config {
    /// Directory where disk-mode scratch files are created.
    pub fn scratch_dir(&self) -> PathBuf {
        self.io_tmp_dir
            .as_ref()
            .map_or_else(std::env::temp_dir, PathBuf::from)
    }
}

pub fn load_rocket_config() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::config::<Config>()
}

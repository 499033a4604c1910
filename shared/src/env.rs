use strum::EnumString;

#[derive(Default, Debug, Clone, Copy, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Development,
    #[default]
    Production,
}

pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => v.parse().unwrap_or(default_env),
    }
}

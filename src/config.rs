use crate::error::ConfigError;
use crate::piece::Side;
use url::Url;

/// Who makes the moves for one side. Fixed for the lifetime of a game.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Controller {
    Human,
    Automated(Url),
}

impl Controller {
    /// A missing or blank endpoint means the side is played by a human.
    pub fn from_endpoint(endpoint: Option<&str>) -> Result<Self, ConfigError> {
        let Some(endpoint) = endpoint.map(str::trim).filter(|endpoint| !endpoint.is_empty()) else {
            return Ok(Self::Human);
        };

        let url = Url::parse(endpoint).map_err(|err| ConfigError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: err.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(Self::Automated(url)),
            _ => Err(ConfigError::UnsupportedScheme {
                endpoint: endpoint.to_owned(),
            }),
        }
    }

    pub fn is_human(&self) -> bool {
        matches!(self, Self::Human)
    }
}

#[derive(Clone, Eq, PartialEq, Debug)]
pub struct GameConfig {
    pub red: Controller,
    pub blue: Controller,
    /// Whether red starts at the bottom of the board (rows 7 to 9).
    pub red_bottom: bool,
    pub first: Side,
}

impl GameConfig {
    pub fn from_endpoints(red: Option<&str>, blue: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            red: Controller::from_endpoint(red)?,
            blue: Controller::from_endpoint(blue)?,
            ..Self::default()
        })
    }

    pub fn with_red_bottom(self, red_bottom: bool) -> Self {
        Self { red_bottom, ..self }
    }

    pub fn with_first(self, first: Side) -> Self {
        Self { first, ..self }
    }

    pub fn controller(&self, side: Side) -> &Controller {
        match side {
            Side::Red => &self.red,
            Side::Blue => &self.blue,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            red: Controller::Human,
            blue: Controller::Human,
            red_bottom: true,
            first: Side::Red,
        }
    }
}

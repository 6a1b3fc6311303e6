use std::time::Duration;

use anyhow::Context;
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

pub const API_URL_KEY: &str = "TESTGENIE_API_URL";
pub const API_TIMEOUT_KEY: &str = "TESTGENIE_API_TIMEOUT_SECS";

/// Where the TestGenie API lives and how long to wait for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub api_url: Url,
    pub timeout: Option<Duration>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse(DEFAULT_API_URL).expect("valid default url"),
            timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn with_api_url(mut self, api_url: &str) -> anyhow::Result<Self> {
        self.api_url = parse_base_url(api_url)?;
        Ok(self)
    }

    pub fn endpoints(&self) -> anyhow::Result<Endpoints> {
        Endpoints::new(&self.api_url)
    }
}

impl LoadFromEnv for ApiConfig {
    fn load_from_env() -> anyhow::Result<Self> {
        load_from_env(&[
            (API_URL_KEY, |this, value| {
                this.api_url = parse_base_url(&value)?;
                Ok(())
            }),
            (API_TIMEOUT_KEY, |this, value| {
                let secs = value.trim().parse()?;
                this.timeout = Some(Duration::from_secs(secs));
                Ok(())
            }),
        ])
    }
}

pub fn parse_base_url(input: &str) -> anyhow::Result<Url> {
    let url = Url::parse(input.trim()).with_context(|| format!("invalid api url: '{input}'"))?;
    anyhow::ensure!(
        matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base(),
        "the api url must be an http or https url, not '{input}'"
    );
    Ok(url)
}

/// The three API endpoints, resolved against a base url
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub generate: Url,
    pub constraints: Url,
    pub feedback: Url,
}

impl Endpoints {
    pub fn new(base: &Url) -> anyhow::Result<Self> {
        // a base without a trailing slash would lose its last path segment on join
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let join = |ep: &str| {
            base.join(ep)
                .with_context(|| format!("cannot join '{ep}' onto '{base}'"))
        };

        Ok(Self {
            generate: join("api/v1/generate")?,
            constraints: join("api/v1/constraints")?,
            feedback: join("api/v1/feedback")?,
        })
    }
}

pub type Assign<T> = fn(&mut T, String) -> anyhow::Result<()>;

/// Builds a `T` from its default, overwriting it with every key that is set
pub fn load_from_env<T: Default + std::fmt::Debug>(
    keys: &[(&str, Assign<T>)],
) -> anyhow::Result<T> {
    log::trace!("loading env vars for: {}", std::any::type_name::<T>());

    let this = keys.iter().try_fold(T::default(), |mut this, (key, func)| {
        log::trace!("looking up {key}");
        match std::env::var(key) {
            Ok(value) => func(&mut this, value)
                .with_context(|| anyhow::anyhow!("key '{key}' has an invalid value"))?,
            Err(_) => log::trace!("'{key}' is not set, using the default"),
        }
        anyhow::Ok(this)
    });

    if let Ok(this) = &this {
        log::debug!("created: {:?}", this);
    }
    this
}

pub trait LoadFromEnv
where
    Self: Sized,
{
    fn load_from_env() -> anyhow::Result<Self>;
}

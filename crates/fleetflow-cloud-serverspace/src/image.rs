//! OS image catalogue

use crate::client::ServerspaceClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};

const IMAGE_BASE_URL: &str = "images";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,

    #[serde(default)]
    pub location_id: String,

    #[serde(default, rename = "type")]
    pub image_type: String,

    #[serde(default)]
    pub os_version: String,

    #[serde(default)]
    pub architecture: String,

    #[serde(default)]
    pub allow_ssh_keys: bool,
}

#[derive(Debug, Deserialize)]
struct ImageListWrap {
    #[serde(default)]
    images: Vec<Image>,
}

impl ServerspaceClient {
    pub async fn list_images(&self) -> Result<Vec<Image>> {
        let wrap: ImageListWrap = self.get(IMAGE_BASE_URL).await?;
        Ok(wrap.images)
    }
}

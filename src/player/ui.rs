//! Player chrome driven by the controller: modal, indicators and channel info.

use serde::Serialize;

/// What the front end should currently render around the video surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlayerUi {
    pub visible: bool,
    pub loading: bool,
    pub error: bool,
    pub channel_name: String,
    pub channel_meta: String,
    pub logo_url: Option<String>,
}

impl PlayerUi {
    pub(crate) fn show(&mut self, name: &str, meta: &str, logo_url: Option<String>) {
        self.visible = true;
        self.channel_name = name.to_string();
        self.channel_meta = meta.to_string();
        self.logo_url = logo_url;
    }

    pub(crate) fn begin_loading(&mut self) {
        self.loading = true;
        self.error = false;
    }

    /// Clearing twice is harmless.
    pub(crate) fn playback_started(&mut self) {
        self.loading = false;
        self.error = false;
    }

    pub(crate) fn terminal_failure(&mut self) {
        self.loading = false;
        self.error = true;
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
        self.loading = false;
    }
}

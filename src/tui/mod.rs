//! Call screens (terminal user interface)
//!
//! One screen per call mode, each owning its controller and event loop.

mod audio_call;
mod overlay;
mod video_call;

use anyhow::{bail, Result};

use crate::auth::SessionStore;
use crate::call::controller::{CallController, CallParams};
use crate::call::loopback::loopback_factory;
use crate::call::{CallError, CallMode};
use crate::config::Config;
use crate::models::User;

/// Start a call to a group and run the matching screen until the user
/// ends the call or the terminal input closes.
pub async fn run_call(group_id: u64, group_name: Option<String>, mode: CallMode) -> Result<()> {
    let config = Config::load()?;
    let params = CallParams {
        app_id: config.rtc_app_id(),
        token: config.rtc_token(),
        group_id,
        group_name: group_name.unwrap_or_else(|| format!("Group {}", group_id)),
        local_uid: User::rtc_uid(config.get_user().as_ref()),
        mode,
    };

    let (controller, events) = match CallController::new(loopback_factory(), params) {
        Ok(pair) => pair,
        Err(CallError::SetupRequired) => {
            bail!(
                "Setup Required: no RTC application id configured.\n\
                 Add rtc_app_id to the config file and try again."
            );
        }
        Err(e) => return Err(e.into()),
    };

    let mut terminal = ratatui::init();
    let result = match mode {
        CallMode::Audio => audio_call::run(&mut terminal, controller, events).await,
        CallMode::Video => video_call::run(&mut terminal, controller, events).await,
    };
    ratatui::restore();
    result
}

use crate::api::models::DeviceCommand;
use crate::api::YotoApi;
use crate::commands::CommandError;
use crate::output;

pub async fn list<A: YotoApi + ?Sized>(api: &A, json: bool) -> Result<(), CommandError> {
    let devices = api.list_devices().await?;

    if json {
        output::json(&devices);
        return Ok(());
    }
    if devices.is_empty() {
        output::info("No devices found.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = devices
        .iter()
        .map(|device| {
            vec![
                device.name.clone(),
                device.device_id.clone(),
                device.device_type.clone().unwrap_or_else(|| "-".to_string()),
                match device.online {
                    Some(true) => "yes".to_string(),
                    Some(false) => "no".to_string(),
                    None => "-".to_string(),
                },
            ]
        })
        .collect();
    output::table(&["Name", "Device ID", "Type", "Online"], &rows);
    Ok(())
}

pub async fn show<A: YotoApi + ?Sized>(
    api: &A,
    device_id: &str,
    json: bool,
) -> Result<(), CommandError> {
    let status = api.get_device_status(device_id).await?;

    if json {
        output::json(&status);
        return Ok(());
    }

    if let Some(player_status) = &status.player_status {
        output::info(&format!("Playback: {}", player_status));
    }
    if let Some(card_id) = &status.card_id {
        output::info(&format!("Card: {}", card_id));
    }
    if let Some(chapter_key) = &status.chapter_key {
        output::info(&format!("Chapter: {}", chapter_key));
    }
    if let Some(track_key) = &status.track_key {
        output::info(&format!("Track: {}", track_key));
    }
    if let Some(volume) = status.volume {
        output::info(&format!("Volume: {:.0}", volume));
    }
    if let Some(battery) = status.battery_level {
        output::info(&format!("Battery: {:.0}%", battery));
    }
    Ok(())
}

/// Send a transport command to a device.
pub async fn command<A: YotoApi + ?Sized>(
    api: &A,
    device_id: &str,
    command: DeviceCommand,
) -> Result<(), CommandError> {
    api.send_device_command(device_id, &command).await?;
    match command {
        DeviceCommand::SetVolume(level) => {
            output::success(&format!("Set volume to {} on {}", level, device_id));
        }
        other => output::success(&format!("Sent {} to {}", other.name(), device_id)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockYotoApi;

    #[tokio::test]
    async fn test_commands_reach_the_device() {
        let api = MockYotoApi::new();
        command(&api, "Y1234", DeviceCommand::Play).await.unwrap();
        command(&api, "Y1234", DeviceCommand::SetVolume(50))
            .await
            .unwrap();

        let sent = api.device_commands();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], ("Y1234".to_string(), "play".to_string(), None));
        assert_eq!(
            sent[1],
            ("Y1234".to_string(), "volume".to_string(), Some(50))
        );
    }

    #[tokio::test]
    async fn test_show_unknown_device_is_api_error() {
        let api = MockYotoApi::new();
        let err = show(&api, "nope", false).await.unwrap_err();
        match err {
            CommandError::Api(_) => {}
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}

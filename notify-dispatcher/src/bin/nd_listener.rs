use common::{
    database::listener::Notification,
    error::{NdError, NdResult},
};
use log::{error, info};
use notify_dispatcher::{database::create_db_pool, listener::NotificationListener};

#[tokio::main]
async fn main() -> NdResult<()> {
    log4rs::init_file("notify-dispatcher/listener_log.yml", Default::default()).unwrap();

    info!("Initializing notification listener");
    let pool = create_db_pool().await?;
    let mut listener = NotificationListener::connect_with(&pool).await?;

    let channels = std::env::var("ND_CHANNELS")?;
    let channels: Vec<&str> = channels
        .split(',')
        .map(str::trim)
        .filter(|channel| !channel.is_empty())
        .collect();
    if channels.is_empty() {
        return Err(NdError::Generic(
            "No channels provided. Set `ND_CHANNELS` to a comma separated list of channel names"
                .to_owned(),
        ));
    }

    for channel in channels {
        let name = channel.to_owned();
        listener
            .subscribe_to_channel(channel, move |notification: Option<&Notification>| match notification {
                Some(notification) => {
                    info!(
                        "Notification on channel `{}` from backend {}. Payload: `{}`",
                        notification.channel(),
                        notification.process_id(),
                        notification.payload()
                    );
                    Ok(())
                }
                None => {
                    info!("Initial run for channel `{name}`");
                    Ok(())
                }
            })
            .await?;
    }

    info!("Starting notification dispatch loop");
    if let Err(error) = listener.start(true).await {
        error!("{}", error);
    }
    Ok(())
}

//! Turn a player configuration document into live [`Stream`]s.

use tracing::warn;

use crate::http_client::{HttpClient, Transport};
use crate::player::PlayerConfig;
use crate::stream::Stream;

/// Build the stream list for a configuration document.
///
/// Every progressive entry is liveness-probed through `transport`.
/// Entries that do not answer 2xx are left out and logged at `warn`.
/// The result is sorted ascending by quality.
pub fn streams_from_config<T: Transport + ?Sized>(
    config: &PlayerConfig,
    transport: &T,
    client: &HttpClient,
) -> Vec<Stream> {
    let title = config.title().map(str::to_string);

    let mut streams: Vec<Stream> = config
        .progressive()
        .iter()
        .filter(|file| match transport.probe(&file.url) {
            Ok(status) if (200..300).contains(&status) => true,
            Ok(status) => {
                warn!(
                    quality = %file.quality,
                    url = %file.url,
                    status,
                    "Dropping stream that failed liveness probe"
                );
                false
            }
            Err(e) => {
                warn!(
                    quality = %file.quality,
                    url = %file.url,
                    error = %e,
                    "Dropping stream that failed liveness probe"
                );
                false
            }
        })
        .map(|file| {
            Stream::new(client.clone(), &file.url, &file.quality, title.clone()).with_format(
                file.width,
                file.height,
                file.fps,
                file.mime.clone(),
            )
        })
        .collect();

    streams.sort();
    streams
}

use crate::aggregator::Aggregator;
use crate::commands::search::user_error;
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{Result, StockError};
use crate::model::Photo;
use crate::save::{Insertion, Saver};
use crate::url_detect::PhotoRef;

/// Saves the photo behind a URL or a prefixed id such as `pexels-2014422`.
pub async fn run(
    aggregator: &Aggregator,
    saver: &Saver<'_>,
    target: &str,
    query: &str,
    insertion: &Insertion,
) -> Result<CmdResult> {
    let photo_ref: PhotoRef = match target.parse() {
        Ok(r) => r,
        Err(e) => return user_error(StockError::Api(e)),
    };
    let photo = match aggregator.fetch(&photo_ref).await {
        Ok(photo) => photo,
        Err(e) => return user_error(e),
    };
    save_photo(aggregator, saver, &photo, query, insertion).await
}

/// Saves a photo already at hand (from a search or browse session).
pub async fn save_photo(
    aggregator: &Aggregator,
    saver: &Saver<'_>,
    photo: &Photo,
    query: &str,
    insertion: &Insertion,
) -> Result<CmdResult> {
    let provider = match aggregator.provider(photo.source) {
        Ok(provider) => provider,
        Err(e) => return user_error(e),
    };

    match saver.save(provider.as_ref(), photo, query, insertion).await {
        Ok(saved) => {
            let mut result = CmdResult::default().with_photo(photo.clone());
            let mut message = format!("Saved {} to {}", photo.id, saved.path.display());
            if let Some(note) = &saved.note {
                message.push_str(&format!(" and added details to {}", note.display()));
            }
            result.add_message(CmdMessage::success(message));
            Ok(result.with_saved(saved))
        }
        Err(e) => user_error(e),
    }
}

// Wishlist submission: request parsing, validation, and persistence.

use serde_json::Value;

use crate::db::Database;
use crate::exchange::{ExchangeError, MAX_WISHLIST_ITEMS};

/// Extract `(name, wishlist)` from a raw JSON request body.
///
/// The body is taken as untyped JSON so shape problems (missing fields, a
/// wishlist that is not a sequence of strings) surface as validation errors
/// rather than as framework-level deserialization failures. Length and
/// emptiness constraints are checked later by [`submit`].
pub fn parse_request(body: &Value) -> Result<(String, Vec<String>), ExchangeError> {
    let name = body
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ExchangeError::validation("name", "must be a string"))?
        .to_string();

    let items = body
        .get("wishlist")
        .and_then(Value::as_array)
        .ok_or_else(|| ExchangeError::validation("wishlist", "must be a sequence"))?;

    let wishlist = items
        .iter()
        .map(|item| {
            item.as_str().map(str::to_string).ok_or_else(|| {
                ExchangeError::validation("wishlist", "every item must be a string")
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok((name, wishlist))
}

/// Validate the submission constraints: a non-empty name and a wishlist
/// with 1 to [`MAX_WISHLIST_ITEMS`] items. An empty list is rejected the
/// same as a missing one.
pub fn validate(name: &str, wishlist: &[String]) -> Result<(), ExchangeError> {
    if name.is_empty() {
        return Err(ExchangeError::validation("name", "must not be empty"));
    }
    if wishlist.is_empty() {
        return Err(ExchangeError::validation("wishlist", "must not be empty"));
    }
    if wishlist.len() > MAX_WISHLIST_ITEMS {
        return Err(ExchangeError::validation(
            "wishlist",
            format!("must have at most {MAX_WISHLIST_ITEMS} items, got {}", wishlist.len()),
        ));
    }
    Ok(())
}

/// Overwrite the wishlist of the participant named `name`.
///
/// Looks up the first participant whose name matches exactly, then replaces
/// (not merges) their stored wishlist. Fails with
/// [`ExchangeError::ParticipantNotFound`] when no participant matches, and
/// performs no write on any validation failure.
pub fn submit(db: &Database, name: &str, wishlist: &[String]) -> Result<(), ExchangeError> {
    validate(name, wishlist)?;

    let participant = db
        .find_by_name(name)?
        .ok_or_else(|| ExchangeError::ParticipantNotFound {
            name: name.to_string(),
        })?;

    db.update_wishlist(participant.id, wishlist)?;
    Ok(())
}

//! # Advertisement Tokens
//!
//! Positional PushDrop fields are read into [`AdvertisementToken`] at the
//! boundary; nothing downstream indexes into the raw field list.

use chrono::{DateTime, SecondsFormat, Utc};
use shared_types::Satoshis;

use crate::domain::errors::TokenError;

/// Field 0 of every advertisement token.
pub const PROTOCOL_MARKER: &str = "1AdDtKreEzbHYKFjmoBuduFmSXXUGZG";

/// Fields an indexable advertisement token carries.
pub const ADVERTISEMENT_FIELD_COUNT: usize = 8;

/// Fields the topic manager requires before it looks at the marker.
pub const MIN_ADMISSIBLE_FIELDS: usize = 4;

const FIELD_NAMES: [&str; ADVERTISEMENT_FIELD_COUNT] = [
    "protocol",
    "title",
    "description",
    "fileHash",
    "endDate",
    "sponsor",
    "rewardPerAnswer",
    "serviceUrl",
];

/// A fully decoded advertisement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvertisementToken {
    pub title: String,
    pub description: String,
    /// UHRP URL of the video.
    pub file_hash: String,
    pub end_date: DateTime<Utc>,
    /// Sponsor identity key, hex.
    pub sponsor: String,
    pub reward_per_answer: Satoshis,
    pub service_url: String,
}

impl AdvertisementToken {
    /// Read an advertisement from decoded PushDrop fields.
    ///
    /// Extra trailing fields (such as a wallet signature) are ignored.
    pub fn try_from_fields(fields: &[Vec<u8>]) -> Result<Self, TokenError> {
        if fields.len() < ADVERTISEMENT_FIELD_COUNT {
            return Err(TokenError::TooFewFields {
                expected: ADVERTISEMENT_FIELD_COUNT,
                actual: fields.len(),
            });
        }

        let marker = String::from_utf8_lossy(&fields[0]);
        if marker != PROTOCOL_MARKER {
            return Err(TokenError::MarkerMismatch(marker.into_owned()));
        }

        let text = |index: usize| -> Result<String, TokenError> {
            String::from_utf8(fields[index].clone()).map_err(|_| TokenError::InvalidUtf8 {
                index,
                name: FIELD_NAMES[index],
            })
        };

        let end_date_text = text(4)?;
        let end_date = DateTime::parse_from_rfc3339(end_date_text.trim())
            .map(|d| d.with_timezone(&Utc))
            .map_err(|_| TokenError::InvalidEndDate(end_date_text.clone()))?;

        let reward_text = text(6)?;
        let reward_per_answer = reward_text
            .trim()
            .parse::<Satoshis>()
            .map_err(|_| TokenError::InvalidReward(reward_text.clone()))?;

        Ok(Self {
            title: text(1)?,
            description: text(2)?,
            file_hash: text(3)?,
            end_date,
            sponsor: text(5)?,
            reward_per_answer,
            service_url: text(7)?,
        })
    }

    /// Positional fields for [`crate::PushDrop::lock`].
    pub fn to_fields(&self) -> Vec<Vec<u8>> {
        vec![
            PROTOCOL_MARKER.as_bytes().to_vec(),
            self.title.as_bytes().to_vec(),
            self.description.as_bytes().to_vec(),
            self.file_hash.as_bytes().to_vec(),
            self.end_date
                .to_rfc3339_opts(SecondsFormat::Millis, true)
                .into_bytes(),
            self.sponsor.as_bytes().to_vec(),
            self.reward_per_answer.to_string().into_bytes(),
            self.service_url.as_bytes().to_vec(),
        ]
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.end_date <= now
    }
}

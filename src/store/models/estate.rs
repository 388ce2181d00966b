use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::files::StoredFile;
use crate::store::StoreError;

/// A digital estate record: a person's named set of assets and
/// beneficiaries, plus an optional attached file.
///
/// `assets` and `beneficiaries` are opaque JSON values from this system's
/// point of view; no internal structure is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigitalEstate {
    pub id: Uuid,
    pub name: String,
    pub dob: NaiveDate,
    pub assets: Vec<Value>,
    pub beneficiaries: Vec<Value>,
    pub file: Option<StoredFile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Raw create-request fields, before schema casting.
///
/// Handlers collect these loosely from JSON or multipart input; the store
/// casts and validates when the draft is inserted, so a malformed draft is a
/// store-level failure rather than a request-shape failure.
#[derive(Debug, Clone, Default)]
pub struct EstateDraft {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub assets: Option<Value>,
    pub beneficiaries: Option<Value>,
    pub file: Option<StoredFile>,
}

impl EstateDraft {
    /// Collect draft fields from a JSON body. Non-object bodies and wrongly
    /// typed fields produce an empty/partial draft that fails the cast.
    pub fn from_value(body: Value) -> Self {
        match body {
            Value::Object(map) => Self {
                name: map.get("name").and_then(Value::as_str).map(str::to_string),
                dob: map.get("dob").and_then(Value::as_str).map(str::to_string),
                assets: map.get("assets").cloned().filter(|v| !v.is_null()),
                beneficiaries: map
                    .get("beneficiaries")
                    .cloned()
                    .filter(|v| !v.is_null()),
                file: None,
            },
            _ => Self::default(),
        }
    }

    /// Cast the draft into a persistable record, assigning id and timestamps.
    ///
    /// Required: non-blank `name`, castable `dob`, present `assets` and
    /// `beneficiaries` (both may be empty sequences).
    pub fn into_record(self) -> Result<DigitalEstate, StoreError> {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| StoreError::Validation("name is required".to_string()))?;

        let dob = self
            .dob
            .as_deref()
            .ok_or_else(|| StoreError::Validation("dob is required".to_string()))
            .and_then(cast_date)?;

        let assets = self
            .assets
            .map(cast_list)
            .ok_or_else(|| StoreError::Validation("assets is required".to_string()))?;

        let beneficiaries = self
            .beneficiaries
            .map(cast_list)
            .ok_or_else(|| StoreError::Validation("beneficiaries is required".to_string()))?;

        let now = Utc::now();
        Ok(DigitalEstate {
            id: Uuid::new_v4(),
            name,
            dob,
            assets,
            beneficiaries,
            file: self.file,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Update-request fields. Absent fields (and explicit `null`) leave the
/// stored value untouched; unknown fields are ignored. `file` is attached at
/// creation only and is not patchable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EstatePatch {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub assets: Option<Value>,
    pub beneficiaries: Option<Value>,
}

impl EstatePatch {
    /// Cast patch fields. Updates cast but do not re-validate required
    /// fields, so a present-but-blank `name` is written as given.
    pub fn cast(self) -> Result<CastPatch, StoreError> {
        let dob = self.dob.as_deref().map(cast_date).transpose()?;
        Ok(CastPatch {
            name: self.name,
            dob,
            assets: self.assets.map(cast_list),
            beneficiaries: self.beneficiaries.map(cast_list),
        })
    }
}

/// An `EstatePatch` after casting, ready to merge onto a stored record.
#[derive(Debug, Clone)]
pub struct CastPatch {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub assets: Option<Vec<Value>>,
    pub beneficiaries: Option<Vec<Value>>,
}

impl CastPatch {
    /// Merge onto a record, field by field, bumping `updated_at`.
    pub fn apply(self, record: &mut DigitalEstate) {
        if let Some(name) = self.name {
            record.name = name;
        }
        if let Some(dob) = self.dob {
            record.dob = dob;
        }
        if let Some(assets) = self.assets {
            record.assets = assets;
        }
        if let Some(beneficiaries) = self.beneficiaries {
            record.beneficiaries = beneficiaries;
        }
        record.updated_at = Utc::now();
    }
}

/// Cast a submitted date string: `YYYY-MM-DD`, or an RFC 3339 timestamp
/// truncated to its date.
fn cast_date(raw: &str) -> Result<NaiveDate, StoreError> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .map_err(|_| StoreError::Validation(format!("invalid date: {raw}")))
}

/// Sequence cast: arrays pass through, a scalar becomes a one-element
/// sequence.
pub(crate) fn cast_list(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

//! Appointment DTOs and their projection from the hierarchy response.

use serde::{Deserialize, Serialize};

/// Bookable appointment category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotType {
    /// Server identifier for the category.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Appointment slot as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentSlot {
    /// Category the slot belongs to.
    pub slot_type: SlotType,
}

/// Body of `Appointment/properties/hierarchy`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct HierarchyResponse {
    #[serde(default)]
    slots: Option<Vec<WireSlot>>,
}

impl HierarchyResponse {
    /// Project server records in response order.
    pub(crate) fn into_slots(self) -> Vec<AppointmentSlot> {
        self.slots
            .unwrap_or_default()
            .into_iter()
            .map(AppointmentSlot::from)
            .collect()
    }
}

// Unknown members (status, default flag, session holders) are dropped by serde.
#[derive(Debug, Deserialize)]
struct WireSlot {
    #[serde(rename = "slotType")]
    slot_type: WireSlotType,
}

#[derive(Debug, Deserialize)]
struct WireSlotType {
    id: String,
    name: String,
}

impl From<WireSlot> for AppointmentSlot {
    fn from(value: WireSlot) -> Self {
        Self {
            slot_type: SlotType {
                id: value.slot_type.id,
                name: value.slot_type.name,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use patientaccess_test_support::payloads::hierarchy_body;

    #[test]
    fn projection_keeps_order_and_drops_extra_fields() -> Result<()> {
        let body = hierarchy_body(&[("10", "GP Appointment"), ("7", "Nurse Clinic")]);
        let response: HierarchyResponse = serde_json::from_value(body)?;
        let slots = response.into_slots();

        assert_eq!(
            slots,
            vec![
                AppointmentSlot {
                    slot_type: SlotType {
                        id: "10".into(),
                        name: "GP Appointment".into(),
                    },
                },
                AppointmentSlot {
                    slot_type: SlotType {
                        id: "7".into(),
                        name: "Nurse Clinic".into(),
                    },
                },
            ]
        );

        let rendered = serde_json::to_value(&slots[0])?;
        assert!(rendered["slot_type"].get("status").is_none());
        assert!(rendered["slot_type"].get("isDefault").is_none());
        Ok(())
    }

    #[test]
    fn duplicates_are_kept() -> Result<()> {
        let body = hierarchy_body(&[("1", "GP"), ("1", "GP")]);
        let response: HierarchyResponse = serde_json::from_value(body)?;
        assert_eq!(response.into_slots().len(), 2);
        Ok(())
    }

    #[test]
    fn missing_or_null_slots_decode_to_empty() -> Result<()> {
        for raw in ["{}", r#"{"slots": null}"#, r#"{"slots": []}"#] {
            let response: HierarchyResponse = serde_json::from_str(raw)?;
            assert!(response.into_slots().is_empty(), "{raw}");
        }
        Ok(())
    }

    #[test]
    fn slot_without_name_is_rejected() {
        let raw = r#"{"slots": [{"slotType": {"id": "1"}}]}"#;
        assert!(serde_json::from_str::<HierarchyResponse>(raw).is_err());
    }
}

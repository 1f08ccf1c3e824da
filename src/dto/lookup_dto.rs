use serde::Serialize;

use crate::models::{AuthorizedSummary, PersonRef, Vehicle, VisitStamp};

/// Resultado de la consulta por placa; se serializa con la etiqueta `type`
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PlateLookup {
    Registered {
        vehicle: Vehicle,
        visits: Vec<VisitStamp>,
        people: Vec<PersonRef>,
    },
    Authorized {
        authorized: AuthorizedSummary,
    },
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_tags() {
        let none = serde_json::to_value(PlateLookup::None).unwrap();
        assert_eq!(none, serde_json::json!({ "type": "none" }));

        let authorized = serde_json::to_value(PlateLookup::Authorized {
            authorized: AuthorizedSummary {
                plate: "ABC1234".into(),
                name: "Ana".into(),
                department: "TI".into(),
            },
        })
        .unwrap();
        assert_eq!(authorized["type"], "authorized");
        assert_eq!(authorized["authorized"]["department"], "TI");
    }
}

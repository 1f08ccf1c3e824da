//! Utilidades de validación
//!
//! Normalización y validación de matrículas, fechas de consulta y el
//! extractor `Valid<T>` que convierte el cuerpo JSON en un valor ya validado.

use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;
use validator::Validate;

use crate::utils::errors::{bad_request_error, AppError, AppResult};

/// Mensaje para cuerpos ausentes o que no son JSON válido
pub const INVALID_BODY_MESSAGE: &str = "Requisição inválida (corpo ausente ou inválido).";

lazy_static! {
    /// Placa clásica: tres letras y cuatro dígitos (ABC1234)
    static ref CLASSIC_PLATE_REGEX: Regex = Regex::new(r"^[A-Z]{3}[0-9]{4}$").unwrap();

    /// Placa Mercosul: tres letras, dígito, letra, dos dígitos (ABC1D23)
    static ref MERCOSUL_PLATE_REGEX: Regex =
        Regex::new(r"^[A-Z]{3}[0-9][A-Z][0-9]{2}$").unwrap();
}

/// Elimina todo lo que no sea letra latina o dígito y pasa a mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Conserva solo los dígitos ASCII
pub fn only_digits(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Matrícula normalizada que cumple uno de los dos formatos aceptados
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Plate(String);

impl Plate {
    /// Normaliza y valida. Devuelve `None` si el resultado no es una placa válida.
    pub fn parse(value: &str) -> Option<Plate> {
        let normalized = normalize_plate(value);
        if normalized.len() != 7 {
            return None;
        }
        if CLASSIC_PLATE_REGEX.is_match(&normalized) || MERCOSUL_PLATE_REGEX.is_match(&normalized)
        {
            Some(Plate(normalized))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Plate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Plate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Plate::parse(&value).ok_or_else(|| format!("invalid plate: {}", value))
    }
}

impl From<Plate> for String {
    fn from(plate: Plate) -> Self {
        plate.0
    }
}

/// Valida una placa recibida en una petición
pub fn require_plate(value: &str) -> AppResult<Plate> {
    if value.trim().is_empty() {
        return Err(bad_request_error("Placa é obrigatória."));
    }
    Plate::parse(value).ok_or_else(|| bad_request_error("Placa inválida."))
}

/// Recorta un texto opcional; las cadenas vacías se tratan como ausentes
pub fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Recorta un texto obligatorio y falla con `message` si queda vacío
pub fn required(value: &str, message: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value.to_string())
}

/// Deserializa un texto opcional recortado; vacío o `null` quedan en `None`
pub fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(trimmed(value))
}

/// Como `blank_as_none` pero distingue campo ausente (`None`, vía `#[serde(default)]`)
/// de campo presente vacío o `null` (`Some(None)`)
pub fn nullable_text<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(Some(trimmed(value)))
}

/// Identificador recibido en la ruta o en la query
pub fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| bad_request_error("Identificador inválido."))
}

/// Validar y convertir string a fecha (YYYY-MM-DD)
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Intervalo inclusivo en UTC que cubre los días `start..=end` completos
pub fn day_range_utc(start: NaiveDate, end: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN));
    let last_instant = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
    let to = Utc.from_utc_datetime(&end.and_time(last_instant));
    (from, to)
}

/// Esquema de validación de un cuerpo de petición.
///
/// `validate()` aplica las reglas declarativas de `validator`; `finish()` produce
/// el valor tipado y normalizado que reciben los controladores.
pub trait RequestSchema: DeserializeOwned + Validate + Send {
    type Valid: Send;

    fn finish(self) -> AppResult<Self::Valid>;
}

/// Extractor que deserializa, valida y normaliza el cuerpo JSON
pub struct Valid<T: RequestSchema>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for Valid<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| AppError::BadRequest(INVALID_BODY_MESSAGE.to_string()))?;
        body.validate()?;
        Ok(Valid(body.finish()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plate_strips_and_uppercases() {
        assert_eq!(normalize_plate("abc-1234"), "ABC1234");
        assert_eq!(normalize_plate(" a b c 1 d 2 3 "), "ABC1D23");
        assert_eq!(normalize_plate("çãé-12"), "12");
        assert_eq!(normalize_plate(""), "");
    }

    #[test]
    fn test_normalize_plate_is_idempotent() {
        for input in ["abc-1234", "xyz 9a87", "  ", "ÁBC_1234!!", "rio2a19-extra"] {
            let once = normalize_plate(input);
            assert_eq!(normalize_plate(&once), once);
        }
    }

    #[test]
    fn test_plate_accepts_both_shapes() {
        assert_eq!(Plate::parse("abc-1234").unwrap().as_str(), "ABC1234");
        assert_eq!(Plate::parse("BRA2E19").unwrap().as_str(), "BRA2E19");
        assert_eq!(Plate::parse("bra 2e19").unwrap().as_str(), "BRA2E19");
    }

    #[test]
    fn test_plate_rejects_other_shapes() {
        assert!(Plate::parse("").is_none());
        assert!(Plate::parse("AB12345").is_none());
        assert!(Plate::parse("ABC12345").is_none());
        assert!(Plate::parse("ABC123").is_none());
        assert!(Plate::parse("ABCD123").is_none());
        assert!(Plate::parse("ABC1DD3").is_none());
        assert!(Plate::parse("1234ABC").is_none());
    }

    #[test]
    fn test_plate_parse_of_own_output_is_stable() {
        let plate = Plate::parse("abc1d23").unwrap();
        assert_eq!(Plate::parse(plate.as_str()), Some(plate));
    }

    #[test]
    fn test_plate_serde_roundtrip_rejects_invalid() {
        let plate: Plate = serde_json::from_str("\"abc-1234\"").unwrap();
        assert_eq!(plate.as_str(), "ABC1234");
        assert!(serde_json::from_str::<Plate>("\"nope\"").is_err());
    }

    #[test]
    fn test_only_digits() {
        assert_eq!(only_digits("a1b2c3"), "123");
        assert_eq!(only_digits("123.456.789-00"), "12345678900");
    }

    #[test]
    fn test_require_plate_messages() {
        assert!(matches!(require_plate("  "), Err(AppError::BadRequest(m)) if m == "Placa é obrigatória."));
        assert!(matches!(require_plate("xx"), Err(AppError::BadRequest(m)) if m == "Placa inválida."));
        assert!(require_plate("abc1234").is_ok());
    }

    #[test]
    fn test_trimmed_and_required() {
        assert_eq!(trimmed(Some("  azul ".into())), Some("azul".into()));
        assert_eq!(trimmed(Some("   ".into())), None);
        assert_eq!(trimmed(None), None);
        assert!(required("  ", "obrigatório").is_err());
        assert_eq!(required(" Ana ", "obrigatório").unwrap(), "Ana");
    }

    #[derive(Debug, Deserialize)]
    struct Optionals {
        #[serde(default, deserialize_with = "blank_as_none")]
        color: Option<String>,
        #[serde(default, deserialize_with = "nullable_text")]
        notes: Option<Option<String>>,
    }

    #[test]
    fn test_optional_text_deserializers() {
        let absent: Optionals = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.color, None);
        assert_eq!(absent.notes, None);

        let cleared: Optionals = serde_json::from_str(r#"{"color":"  ","notes":null}"#).unwrap();
        assert_eq!(cleared.color, None);
        assert_eq!(cleared.notes, Some(None));

        let set: Optionals = serde_json::from_str(r#"{"color":" azul ","notes":" ok "}"#).unwrap();
        assert_eq!(set.color.as_deref(), Some("azul"));
        assert_eq!(set.notes, Some(Some("ok".to_string())));
    }

    #[test]
    fn test_day_range_covers_whole_days() {
        let start = parse_date("2024-01-01").unwrap();
        let end = parse_date("2024-01-31").unwrap();
        let (from, to) = day_range_utc(start, end);
        assert_eq!(from.to_rfc3339(), "2024-01-01T00:00:00+00:00");
        assert_eq!(
            to.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            "2024-01-31T23:59:59.999Z"
        );
        assert!(parse_date("2024/01/01").is_none());
    }
}

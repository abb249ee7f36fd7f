//! Registry record types.
//!
//! # Design
//! A `Persona` is an attribute bag. The seven fields the screen shows are
//! typed as strings and accept any JSON scalar on the way in; every other
//! attribute the registry sends is kept in `extra` so a read/edit/write
//! cycle never drops data. Field names on the wire follow the registry
//! (including its `verficado` spelling); Rust names are English.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// A person or business record from the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    #[serde(rename = "identificacion", default, deserialize_with = "lenient_string")]
    pub identification: String,
    #[serde(rename = "lic_apellido", default, deserialize_with = "lenient_string")]
    pub last_name: String,
    #[serde(rename = "lic_nombre", default, deserialize_with = "lenient_string")]
    pub first_name: String,
    /// Tax identification number.
    #[serde(default, deserialize_with = "lenient_string")]
    pub ruc: String,
    /// Identifier used to match updates against loaded records.
    #[serde(rename = "codigo", default, deserialize_with = "lenient_string")]
    pub code: String,
    #[serde(rename = "verficado", default, deserialize_with = "lenient_string")]
    pub verified: String,
    #[serde(rename = "razon_social", default, deserialize_with = "lenient_string")]
    pub legal_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    })
}

impl Persona {
    pub fn field(&self, field: PersonaField) -> &str {
        match field {
            PersonaField::Identification => &self.identification,
            PersonaField::LastName => &self.last_name,
            PersonaField::FirstName => &self.first_name,
            PersonaField::Ruc => &self.ruc,
            PersonaField::Code => &self.code,
            PersonaField::Verified => &self.verified,
            PersonaField::LegalName => &self.legal_name,
        }
    }

    pub fn set(&mut self, field: PersonaField, value: impl Into<String>) {
        let slot = match field {
            PersonaField::Identification => &mut self.identification,
            PersonaField::LastName => &mut self.last_name,
            PersonaField::FirstName => &mut self.first_name,
            PersonaField::Ruc => &mut self.ruc,
            PersonaField::Code => &mut self.code,
            PersonaField::Verified => &mut self.verified,
            PersonaField::LegalName => &mut self.legal_name,
        };
        *slot = value.into();
    }

    /// Set a field by wire or Rust name. Names that are not one of the seven
    /// known fields are stored as extra string attributes.
    pub fn set_by_name(&mut self, name: &str, value: impl Into<String>) {
        match name.parse::<PersonaField>() {
            Ok(field) => self.set(field, value),
            Err(_) => {
                self.extra
                    .insert(name.to_string(), Value::String(value.into()));
            }
        }
    }
}

/// The seven fields shown in the table and the edit modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PersonaField {
    Identification,
    LastName,
    FirstName,
    Ruc,
    Code,
    Verified,
    LegalName,
}

impl PersonaField {
    /// Display order of the table columns and modal inputs.
    pub const ALL: [PersonaField; 7] = [
        PersonaField::Identification,
        PersonaField::LastName,
        PersonaField::FirstName,
        PersonaField::Ruc,
        PersonaField::Code,
        PersonaField::Verified,
        PersonaField::LegalName,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            PersonaField::Identification => "identificacion",
            PersonaField::LastName => "lic_apellido",
            PersonaField::FirstName => "lic_nombre",
            PersonaField::Ruc => "ruc",
            PersonaField::Code => "codigo",
            PersonaField::Verified => "verficado",
            PersonaField::LegalName => "razon_social",
        }
    }

    /// Column header.
    pub fn label(self) -> &'static str {
        match self {
            PersonaField::Identification => "Identificación",
            PersonaField::LastName => "Apellidos",
            PersonaField::FirstName => "Nombres",
            PersonaField::Ruc => "RUC",
            PersonaField::Code => "Código",
            PersonaField::Verified => "Verificado",
            PersonaField::LegalName => "Razón Social",
        }
    }
}

impl fmt::Display for PersonaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown persona field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for PersonaField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "identificacion" | "identification" => Ok(PersonaField::Identification),
            "lic_apellido" | "last_name" => Ok(PersonaField::LastName),
            "lic_nombre" | "first_name" => Ok(PersonaField::FirstName),
            "ruc" | "tax_id" => Ok(PersonaField::Ruc),
            "codigo" | "code" => Ok(PersonaField::Code),
            "verficado" | "verified" => Ok(PersonaField::Verified),
            "razon_social" | "legal_name" => Ok(PersonaField::LegalName),
            other => Err(UnknownField(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persona_uses_registry_field_names() {
        let persona = Persona {
            code: "C-1".to_string(),
            verified: "SI".to_string(),
            ..Persona::default()
        };
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["codigo"], "C-1");
        assert_eq!(json["verficado"], "SI");
        assert_eq!(json["lic_apellido"], "");
    }

    #[test]
    fn scalars_are_read_as_strings() {
        let persona: Persona = serde_json::from_str(
            r#"{"identificacion":912345678,"ruc":null,"verficado":true,"codigo":"7"}"#,
        )
        .unwrap();
        assert_eq!(persona.identification, "912345678");
        assert_eq!(persona.ruc, "");
        assert_eq!(persona.verified, "true");
        assert_eq!(persona.code, "7");
        assert_eq!(persona.legal_name, "");
    }

    #[test]
    fn unknown_attributes_survive_a_roundtrip() {
        let persona: Persona =
            serde_json::from_str(r#"{"codigo":"7","id":42,"direccion":"Quito"}"#).unwrap();
        assert_eq!(persona.extra["id"], 42);
        let json = serde_json::to_value(&persona).unwrap();
        assert_eq!(json["id"], 42);
        assert_eq!(json["direccion"], "Quito");
        assert_eq!(json["codigo"], "7");
    }

    #[test]
    fn field_names_parse_in_both_spellings() {
        assert_eq!("ruc".parse::<PersonaField>().unwrap(), PersonaField::Ruc);
        assert_eq!("verified".parse::<PersonaField>().unwrap(), PersonaField::Verified);
        assert_eq!("verficado".parse::<PersonaField>().unwrap(), PersonaField::Verified);
        assert!("apellido".parse::<PersonaField>().is_err());
    }

    #[test]
    fn set_by_name_touches_only_the_named_field() {
        let mut persona = Persona {
            first_name: "Ana".to_string(),
            ..Persona::default()
        };
        persona.set_by_name("lic_apellido", "Mora");
        assert_eq!(persona.last_name, "Mora");
        assert_eq!(persona.first_name, "Ana");

        persona.set_by_name("telefono", "555");
        assert_eq!(persona.extra["telefono"], "555");
    }

    #[test]
    fn wire_names_parse_back() {
        for field in PersonaField::ALL {
            assert_eq!(field.wire_name().parse::<PersonaField>().unwrap(), field);
        }
    }
}

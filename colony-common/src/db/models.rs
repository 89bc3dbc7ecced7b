//! Database models
//!
//! Serialized with camelCase field names, the shape the web client expects.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Sex of a mouse entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
            Sex::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MALE" => Ok(Sex::Male),
            "FEMALE" => Ok(Sex::Female),
            "UNKNOWN" => Ok(Sex::Unknown),
            other => Err(crate::Error::InvalidInput(format!("Unknown sex: {}", other))),
        }
    }
}

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
        }
    }
}

impl FromStr for Role {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Role::User),
            "ADMIN" => Ok(Role::Admin),
            other => Err(crate::Error::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// Role of a user inside one laboratory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LabRole {
    Admin,
    Member,
}

impl LabRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabRole::Admin => "ADMIN",
            LabRole::Member => "MEMBER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Laboratory {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

/// A mouse line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Strain {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub laboratory_id: Option<Uuid>,
}

/// A housing unit scoped to a strain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cage {
    pub id: Uuid,
    pub strain_id: Uuid,
    pub cage_number: String,
    pub group_id: Option<String>,
    pub mating_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One or more identical mice housed in a cage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mouse {
    pub id: Uuid,
    pub cage_id: Uuid,
    pub sex: Sex,
    pub quantity: i64,
    pub genotype: Option<String>,
    pub dob: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Fields for a cage insert
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCage {
    pub cage_number: String,
    pub group_id: Option<String>,
    pub mating_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Fields for a mouse insert
#[derive(Debug, Clone, PartialEq)]
pub struct NewMouse {
    pub sex: Sex,
    pub quantity: i64,
    pub genotype: Option<String>,
    pub dob: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl Default for NewMouse {
    fn default() -> Self {
        Self {
            sex: Sex::Unknown,
            quantity: 1,
            genotype: None,
            dob: None,
            notes: None,
        }
    }
}

/// Cage with its mice, as returned by strain detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CageWithMice {
    #[serde(flatten)]
    pub cage: Cage,
    pub mice: Vec<Mouse>,
}

/// Strain list entry with cage count
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainSummary {
    #[serde(flatten)]
    pub strain: Strain,
    pub cage_count: i64,
    pub laboratory: Option<Laboratory>,
}

/// Full strain detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrainDetail {
    #[serde(flatten)]
    pub strain: Strain,
    pub cages: Vec<CageWithMice>,
    pub laboratory: Option<Laboratory>,
}

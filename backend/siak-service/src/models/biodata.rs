use serde::{Deserialize, Deserializer, Serialize};

/// `KODESTATUS` value the SIAK system uses for graduated students
pub const GRADUATED_STATUS: &str = "2";

/// Student biodata record as returned by the SIAK API
///
/// Decoded leniently: unknown keys are ignored, missing keys and `null`
/// values become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MhsBiodata {
    #[serde(rename = "NIM", deserialize_with = "null_as_empty")]
    pub nim: String,
    #[serde(rename = "NAMA", deserialize_with = "null_as_empty")]
    pub nama: String,
    #[serde(rename = "KODEFAK", deserialize_with = "null_as_empty")]
    pub kode_fakultas: String,
    #[serde(rename = "NAMAFAK", deserialize_with = "null_as_empty")]
    pub nama_fakultas: String,
    #[serde(rename = "KODEPST", deserialize_with = "null_as_empty")]
    pub kode_prodi: String,
    #[serde(rename = "NAMAPST", deserialize_with = "null_as_empty")]
    pub nama_prodi: String,
    #[serde(rename = "JENJANG", deserialize_with = "null_as_empty")]
    pub jenjang: String,
    #[serde(rename = "ANGKATAN", deserialize_with = "null_as_empty")]
    pub angkatan: String,
    #[serde(rename = "TGLSIDANG", deserialize_with = "null_as_empty")]
    pub tgl_sidang: String,
    #[serde(rename = "KODESTATUS", deserialize_with = "null_as_empty")]
    pub kode_status: String,
    #[serde(rename = "EMAIL", deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(rename = "HP", deserialize_with = "null_as_empty")]
    pub hp: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Result of checking a record against a claimed graduation-session date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlumniVerdict {
    /// The claimed date differs from the record
    DateMismatch,
    /// Date matches and the student has graduated
    Alumni,
    /// Date matches but the student has not graduated
    NotYetAlumni,
}

impl AlumniVerdict {
    pub fn is_alumni(&self) -> bool {
        matches!(self, AlumniVerdict::Alumni)
    }
}

impl MhsBiodata {
    /// Date is compared as an exact string
    pub fn alumni_verdict(&self, tgl_sidang: &str) -> AlumniVerdict {
        if self.tgl_sidang != tgl_sidang {
            AlumniVerdict::DateMismatch
        } else if self.kode_status == GRADUATED_STATUS {
            AlumniVerdict::Alumni
        } else {
            AlumniVerdict::NotYetAlumni
        }
    }
}

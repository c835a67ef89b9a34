use serde::{Deserialize, Deserializer};

// clients send ids both as numbers and as numeric strings, e.g. [1, "7"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LooseI64(pub i64);

impl<'de> Deserialize<'de> for LooseI64 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(v) => Ok(LooseI64(v)),
            Raw::Text(text) => match text.trim().parse::<i64>() {
                Ok(v) => Ok(LooseI64(v)),
                Err(_) => Err(serde::de::Error::custom(format!(
                    "Wrong value {text}, can not parse to i64"
                ))),
            },
        }
    }
}

pub fn into_ids(values: Vec<LooseI64>) -> Vec<i64> {
    values.into_iter().map(|v| v.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let ids: Vec<LooseI64> = serde_json::from_str(r#"[1, "7", " 12 "]"#).unwrap();
        assert_eq!(into_ids(ids), vec![1, 7, 12]);
    }

    #[test]
    fn rejects_non_numeric_strings() {
        assert!(serde_json::from_str::<Vec<LooseI64>>(r#"["seven"]"#).is_err());
        assert!(serde_json::from_str::<LooseI64>("1.5").is_err());
    }
}

use std::collections::HashMap;
use std::str::FromStr;

use derive_traits::PtolemyParameters;
use log::debug;
use serde_yaml::Mapping;
use serde_yaml::Value;

use crate::error::PtolemyError;
use crate::error::Result;

/// Replaces a value in a section of the parameter file, given on the
/// command line as `section.key.subkey=value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Override {
    pub section: String,
    pub keys: Vec<String>,
    pub value: Value,
}

impl FromStr for Override {
    type Err = PtolemyError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| {
            PtolemyError::Parameters(format!("invalid override {}: {}", s, reason))
        };
        let (path, value) = s.split_once('=').ok_or_else(|| invalid("expected '='"))?;
        let mut keys = path.trim().split('.').map(|key| key.to_owned());
        let section = keys
            .next()
            .filter(|section| !section.is_empty())
            .ok_or_else(|| invalid("missing section"))?;
        let value = serde_yaml::from_str(value.trim()).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self {
            section,
            keys: keys.collect(),
            value,
        })
    }
}

pub struct ParameterFileContents {
    sections: HashMap<String, Value>,
    overrides: Vec<Override>,
}

fn insert_overrides(value: &mut Value, overrides: &[Override]) -> Result<()> {
    for o in overrides.iter() {
        set_sublevel_value_by_keys(value, &o.keys, o.value.clone())?;
    }
    Ok(())
}

fn section_error(section_name: &str, e: impl std::fmt::Display) -> PtolemyError {
    PtolemyError::Parameters(format!("failed to read section {}: {}", section_name, e))
}

fn extract_from_default<T: PtolemyParameters>(
    section_name: &str,
    overrides: &[Override],
) -> Result<T> {
    debug!(
        "Parameter section missing for '{}', assuming defaults",
        section_name
    );
    let mut value = Value::Mapping(Mapping::default());
    insert_overrides(&mut value, overrides)?;
    serde_yaml::from_value::<T>(value).map_err(|e| section_error(section_name, e))
}

fn extract_from_section<T: PtolemyParameters>(
    section_name: &str,
    overrides: &[Override],
    section_value: &mut Value,
) -> Result<T> {
    insert_overrides(section_value, overrides)?;
    serde_yaml::from_value::<T>(section_value.clone()).map_err(|e| section_error(section_name, e))
}

/// Constructs a map of the form
/// key1: key2: key3: ... key_n: Value
/// If keys is empty, returns value
fn construct_sub_mapping(keys: &[String], value: Value) -> Value {
    if keys.is_empty() {
        value
    } else {
        let mut map = Mapping::default();
        map.insert(
            Value::String(keys[0].clone()),
            construct_sub_mapping(&keys[1..], value),
        );
        Value::Mapping(map)
    }
}

fn set_sublevel_value_by_keys(value: &mut Value, keys: &[String], target_value: Value) -> Result<()> {
    if keys.is_empty() {
        *value = target_value;
        return Ok(());
    }
    let mapping = value.as_mapping_mut().ok_or_else(|| {
        PtolemyError::Parameters(format!("cannot set {} in a value that is not a mapping", keys[0]))
    })?;
    match mapping.get_mut(&keys[0]) {
        Some(entry) => set_sublevel_value_by_keys(entry, &keys[1..], target_value),
        None => {
            mapping.insert(
                Value::String(keys[0].clone()),
                construct_sub_mapping(&keys[1..], target_value),
            );
            Ok(())
        }
    }
}

impl ParameterFileContents {
    pub fn new(contents: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(contents)
            .map_err(|e| PtolemyError::Parameters(format!("invalid parameter file: {}", e)))?;
        let sections = match value {
            Value::Null => HashMap::new(),
            Value::Mapping(mapping) => mapping
                .into_iter()
                .map(|(k, v)| match k {
                    Value::String(name) => Ok((name, v)),
                    k => Err(PtolemyError::Parameters(format!(
                        "non-string parameter section {:?}",
                        k
                    ))),
                })
                .collect::<Result<_>>()?,
            _ => {
                return Err(PtolemyError::Parameters(
                    "parameter file is not a mapping".into(),
                ))
            }
        };
        Ok(Self {
            sections,
            overrides: vec![],
        })
    }

    pub fn with_overrides(&mut self, overrides: Vec<Override>) {
        self.overrides = overrides;
    }

    pub fn get_section_names(&self) -> impl Iterator<Item = &String> {
        self.sections.keys()
    }

    fn get_overrides_for_section<'a>(
        &'a self,
        section_name: &'a str,
    ) -> impl Iterator<Item = Override> + 'a {
        self.overrides
            .iter()
            .filter(move |o| o.section == section_name)
            .cloned()
    }

    /// All sections read so far, including the ones filled with
    /// defaults.
    pub fn contents(&self) -> Result<String> {
        let mut names: Vec<&String> = self.sections.keys().collect();
        names.sort();
        let mut map = Mapping::default();
        for name in names {
            map.insert(Value::String(name.clone()), self.sections[name].clone());
        }
        serde_yaml::to_string(&map)
            .map_err(|e| PtolemyError::Parameters(format!("failed to write parameters: {}", e)))
    }

    pub fn extract_parameter_struct<T: PtolemyParameters>(&mut self) -> Result<T> {
        let section_name = T::section_name().ok_or_else(|| {
            PtolemyError::Parameters("parameter struct without section name".into())
        })?;
        let overrides_this_section = self
            .get_overrides_for_section(section_name)
            .collect::<Vec<_>>();
        match self.sections.get_mut(section_name) {
            Some(section_value) => {
                extract_from_section(section_name, &overrides_this_section, section_value)
            }
            None => {
                let extracted = extract_from_default::<T>(section_name, &overrides_this_section)?;
                let value = serde_yaml::to_value(&extracted)
                    .map_err(|e| section_error(section_name, e))?;
                self.sections.insert(section_name.to_string(), value);
                Ok(extracted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use derive_custom::ptolemy_parameters;

    use super::Override;
    use super::ParameterFileContents;

    #[ptolemy_parameters("x")]
    struct X {
        a: usize,
        b: usize,
    }

    #[test]
    fn r#override() {
        let mut contents = ParameterFileContents::new("x:\n  a: 1\n  b: 2").unwrap();
        contents.with_overrides(vec![Override {
            section: "x".into(),
            keys: vec!["a".into()],
            value: 5.into(),
        }]);
        let x = contents.extract_parameter_struct::<X>().unwrap();
        assert_eq!(x.a, 5);
        assert_eq!(x.b, 2);
    }

    #[test]
    fn r#override_in_omitted_section() {
        let mut contents = ParameterFileContents::new("").unwrap();
        contents.with_overrides(vec![
            Override {
                section: "x".into(),
                keys: vec!["b".into()],
                value: 6.into(),
            },
            Override {
                section: "x".into(),
                keys: vec!["a".into()],
                value: 5.into(),
            },
        ]);
        let x = contents.extract_parameter_struct::<X>().unwrap();
        assert_eq!(x.a, 5);
        assert_eq!(x.b, 6);
        assert!(contents.contents().unwrap().contains("a: 5"));
    }

    #[test]
    fn r#override_omitted_section() {
        #[ptolemy_parameters("s")]
        struct Section(i32);

        let mut contents = ParameterFileContents::new("").unwrap();
        contents.with_overrides(vec![Override {
            section: "s".into(),
            keys: vec![],
            value: 5.into(),
        }]);
        let section = contents.extract_parameter_struct::<Section>().unwrap();
        assert_eq!(section.0, 5);
    }

    #[test]
    fn r#override_omitted_field() {
        #[ptolemy_parameters("y")]
        struct Y {
            #[serde(default)]
            a: usize,
            b: usize,
        }

        let mut contents = ParameterFileContents::new("y:\n  b: 2").unwrap();
        contents.with_overrides(vec![Override {
            section: "y".into(),
            keys: vec!["a".into()],
            value: 5.into(),
        }]);
        let y = contents.extract_parameter_struct::<Y>().unwrap();
        assert_eq!(y.a, 5);
        assert_eq!(y.b, 2);
    }

    #[test]
    fn missing_required_section() {
        let mut contents = ParameterFileContents::new("").unwrap();
        assert!(contents.extract_parameter_struct::<X>().is_err());
        let mut contents = ParameterFileContents::new("x:\n  a: 1\n  b: 2\n  c: 3").unwrap();
        assert!(contents.extract_parameter_struct::<X>().is_err());
        assert!(ParameterFileContents::new("- 1\n- 2").is_err());
    }

    #[test]
    fn overrides_from_strings() {
        let o: Override = "solver.seed=5".parse().unwrap();
        assert_eq!(o.section, "solver");
        assert_eq!(o.keys, vec!["seed".to_string()]);
        assert_eq!(o.value, serde_yaml::Value::from(5));
        let o: Override = "decomposition.arguments=[-b, -q]".parse().unwrap();
        assert!(o.value.is_sequence());
        assert!("solver.seed".parse::<Override>().is_err());
        assert!("=5".parse::<Override>().is_err());
    }
}

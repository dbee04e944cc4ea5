use std::collections::HashMap;

use crate::markdown::Converter;

/// Template filter rendering a string value as Markdown.
pub struct Markdown {
    converter: Converter,
}

impl Markdown {
    pub fn new(converter: Converter) -> Self {
        Markdown { converter }
    }
}

impl tera::Filter for Markdown {
    fn filter(
        &self,
        value: &tera::Value,
        _args: &HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let input = tera::from_value::<String>(value.clone())?;

        Ok(tera::to_value(self.converter.convert_str(&input))?)
    }

    fn is_safe(&self) -> bool {
        true
    }
}

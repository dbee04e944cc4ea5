use pulldown_cmark::{html, Options, Parser};

/// Markdown to HTML converter.
///
/// Raw HTML in the source is passed through untouched, so documents must be
/// trusted.
#[derive(Clone, Copy, Debug)]
pub struct Converter {
    options: Options,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_FOOTNOTES);

        Self { options }
    }

    /// Converts raw document bytes. Fails if the input is not UTF-8.
    pub fn convert(&self, input: &[u8]) -> Result<String, std::str::Utf8Error> {
        let text = std::str::from_utf8(input)?;
        Ok(self.convert_str(text))
    }

    pub fn convert_str(&self, input: &str) -> String {
        let parser = Parser::new_ext(input, self.options);

        let mut contents = String::new();
        html::push_html(&mut contents, parser);

        contents
    }
}

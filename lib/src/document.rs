use memchr::{memchr, memmem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Lowercased attribute name.
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    pub attributes: Vec<Attribute>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Element { tag: tag.to_ascii_lowercase(), attributes: vec![] }
    }

    pub fn with_attribute(mut self, name: &str, value: Option<&str>) -> Self {
        self.attributes.push(Attribute {
            name: name.to_ascii_lowercase(),
            value: value.map(|v| v.to_string()),
        });

        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")?.value.as_deref()
    }
}

/// Anything that can enumerate the elements carrying a marker attribute.
pub trait SlideSource {
    /// The ids of every element carrying `marker`, in document order.
    /// Elements without an id are skipped.
    fn marked_ids(&self, marker: &str) -> Vec<&str>;
}

/// The elements of an HTML document, flattened into document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new(elements: Vec<Element>) -> Self {
        Document { elements }
    }

    /// Collects the start tags in `html`.
    ///
    /// This is a scanner, not a validating parser: end tags, comments, and
    /// declarations are skipped, and malformed markup yields whatever
    /// elements could be recognized.
    ///
    /// ```
    /// use foil::document::{Document, SlideSource};
    ///
    /// let html = r#"
    ///     <section data-slide id="slide-0">Hello</section>
    ///     <!-- <section data-slide id="slide-9"> -->
    ///     <section data-slide id='slide-1'><p>World</p></section>
    /// "#;
    ///
    /// let document = Document::parse(html);
    /// assert_eq!(document.marked_ids("data-slide"), ["slide-0", "slide-1"]);
    /// ```
    pub fn parse(html: &str) -> Self {
        let bytes = html.as_bytes();
        let mut elements = vec![];
        let mut pos = 0;
        while let Some(offset) = memchr(b'<', &bytes[pos..]) {
            let start = pos + offset + 1;
            let rest = &html[start..];
            if rest.starts_with("!--") {
                match memmem::find(rest.as_bytes(), b"-->") {
                    Some(end) => pos = start + end + 3,
                    None => break,
                }

                continue;
            }

            if !rest.bytes().next().map_or(false, |b| b.is_ascii_alphabetic()) {
                pos = start;
                continue;
            }

            let (element, consumed) = scan_tag(rest);
            elements.push(element);
            pos = start + consumed;
        }

        Document { elements }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn marked<'a>(&'a self, marker: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().filter(move |e| e.has_attribute(marker))
    }
}

impl SlideSource for Document {
    fn marked_ids(&self, marker: &str) -> Vec<&str> {
        self.elements.iter()
            .filter(|e| e.has_attribute(marker))
            .filter_map(|e| e.id())
            .collect()
    }
}

/// Scans a start tag whose name begins `input`. Returns the element and the
/// number of bytes consumed, including the closing `>` if there is one.
fn scan_tag(input: &str) -> (Element, usize) {
    let bytes = input.as_bytes();
    let is_name = |b: u8| b.is_ascii_alphanumeric() || b == b'-' || b == b':';
    let skip_whitespace = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        i
    };

    let mut i = bytes.iter().position(|&b| !is_name(b)).unwrap_or(bytes.len());
    let mut element = Element::new(&input[..i]);
    loop {
        i = skip_whitespace(i);
        match bytes.get(i) {
            None => break,
            Some(b'>') => { i += 1; break; }
            Some(b'/') => { i += 1; continue; }
            Some(_) => {}
        }

        let name_start = i;
        while i < bytes.len()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
            && !bytes[i].is_ascii_whitespace()
        {
            i += 1;
        }

        let name = &input[name_start..i];
        i = skip_whitespace(i);
        let value = match bytes.get(i) {
            Some(b'=') => {
                i = skip_whitespace(i + 1);
                match bytes.get(i) {
                    Some(&quote @ (b'"' | b'\'')) => {
                        let value_start = i + 1;
                        let value_end = memchr(quote, &bytes[value_start..])
                            .map_or(bytes.len(), |end| value_start + end);

                        i = (value_end + 1).min(bytes.len());
                        Some(&input[value_start..value_end])
                    }
                    _ => {
                        let value_start = i;
                        while i < bytes.len() && bytes[i] != b'>' && !bytes[i].is_ascii_whitespace() {
                            i += 1;
                        }

                        Some(&input[value_start..i])
                    }
                }
            }
            _ => None,
        };

        if !name.is_empty() {
            element = element.with_attribute(name, value);
        }
    }

    (element, i)
}

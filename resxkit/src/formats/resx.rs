//! Reader and writer for .NET `.resx` XML resource files.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{
    collections::HashSet,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use crate::{
    error::Error,
    traits::{Parser, read_to_string_bom_aware},
    types::{AssemblyRef, Entry, FILE_REF_TYPE_NAME, FileRef, ResHeader},
};

const RESX_MIME_TYPE: &str = "text/microsoft-resx";
const RESX_VERSION: &str = "2.0";
const RESX_READER: &str = "System.Resources.ResXResourceReader, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";
const RESX_WRITER: &str = "System.Resources.ResXResourceWriter, System.Windows.Forms, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

/// An in-memory `.resx` document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Format {
    /// `<assembly>` aliases referenced by typed entries.
    pub assemblies: Vec<AssemblyRef>,

    /// `<resheader>` elements as read. The standard four are always written.
    pub headers: Vec<ResHeader>,

    /// `<data>` nodes in document order.
    pub entries: Vec<Entry>,

    /// Directory that relative file references resolve against.
    ///
    /// Only set when reading a project's `Properties/Resources.resx`, whose
    /// references are authored relative to the `Properties` folder.
    pub base_path: Option<PathBuf>,
}

impl Format {
    pub fn new(entries: Vec<Entry>) -> Self {
        Format {
            entries,
            ..Default::default()
        }
    }

    /// Resolves the target of a file reference entry, honouring `base_path`.
    pub fn resolve_file_ref(&self, file_ref: &FileRef, resx_dir: &Path) -> PathBuf {
        file_ref.resolve(self.base_path.as_deref().unwrap_or(resx_dir))
    }

    fn standard_headers() -> [(&'static str, &'static str); 4] {
        [
            ("resmimetype", RESX_MIME_TYPE),
            ("version", RESX_VERSION),
            ("reader", RESX_READER),
            ("writer", RESX_WRITER),
        ]
    }
}

/// Whether `path` is the designer-managed `Properties/Resources.resx` of a project.
pub fn is_project_resources_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == "Resources.resx")
        && path
            .parent()
            .and_then(Path::file_name)
            .is_some_and(|dir| dir == "Properties")
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut skip_buf = Vec::new();
        let mut format = Format::default();
        let mut seen_keys = HashSet::new();

        loop {
            match xml_reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"root" => {}
                    b"data" => {
                        let entry = parse_data(e, &mut xml_reader, false)?;
                        push_entry(&mut format.entries, &mut seen_keys, entry)?;
                    }
                    b"resheader" => {
                        let name = required_attribute(e, b"resheader", b"name")?;
                        let value = read_children(&mut xml_reader, b"resheader")?
                            .value
                            .unwrap_or_default();
                        format.headers.push(ResHeader { name, value });
                    }
                    b"assembly" => {
                        format.assemblies.push(parse_assembly(e)?);
                        xml_reader.read_to_end_into(e.name(), &mut skip_buf)?;
                    }
                    // xsd:schema, metadata and anything unknown
                    _ => {
                        xml_reader.read_to_end_into(e.name(), &mut skip_buf)?;
                    }
                },
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"data" => {
                        let entry = parse_data(e, &mut xml_reader, true)?;
                        push_entry(&mut format.entries, &mut seen_keys, entry)?;
                    }
                    b"assembly" => format.assemblies.push(parse_assembly(e)?),
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
            skip_buf.clear();
        }

        Ok(format)
    }

    /// Parse from file path, recording the base path for project resources.
    fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, Error>
    where
        Self: Sized,
    {
        let path = path.as_ref();
        let mut format = Self::from_str(&read_to_string_bom_aware(path)?)?;
        if is_project_resources_file(path) {
            format.base_path = path.parent().map(Path::to_path_buf);
        }
        Ok(format)
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new_with_indent(&mut writer, b' ', 2);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        xml_writer.write_event(Event::Start(BytesStart::new("root")))?;

        let standard = Format::standard_headers();
        let extra = self
            .headers
            .iter()
            .filter(|h| !standard.iter().any(|(name, _)| *name == h.name))
            .map(|h| (h.name.as_str(), h.value.as_str()));
        for (name, value) in standard.into_iter().chain(extra) {
            let mut elem = BytesStart::new("resheader");
            elem.push_attribute(("name", name));
            xml_writer.write_event(Event::Start(elem))?;
            write_text_element(&mut xml_writer, "value", value)?;
            xml_writer.write_event(Event::End(BytesEnd::new("resheader")))?;
        }

        for assembly in &self.assemblies {
            let mut elem = BytesStart::new("assembly");
            if let Some(alias) = &assembly.alias {
                elem.push_attribute(("alias", alias.as_str()));
            }
            elem.push_attribute(("name", assembly.name.as_str()));
            xml_writer.write_event(Event::Empty(elem))?;
        }

        for entry in &self.entries {
            write_entry(&mut xml_writer, entry)?;
        }

        xml_writer.write_event(Event::End(BytesEnd::new("root")))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

fn push_entry(
    entries: &mut Vec<Entry>,
    seen_keys: &mut HashSet<String>,
    entry: Entry,
) -> Result<(), Error> {
    if !seen_keys.insert(entry.key.clone()) {
        return Err(Error::DuplicateKey(entry.key));
    }
    entries.push(entry);
    Ok(())
}

fn required_attribute(e: &BytesStart, element: &[u8], attribute: &[u8]) -> Result<String, Error> {
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        if attr.key.as_ref() == attribute {
            return Ok(attr.unescape_value()?.to_string());
        }
    }
    Err(Error::invalid_resource(format!(
        "{} tag missing '{}'",
        String::from_utf8_lossy(element),
        String::from_utf8_lossy(attribute)
    )))
}

fn parse_assembly(e: &BytesStart) -> Result<AssemblyRef, Error> {
    let mut alias = None;
    let mut name = None;
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        match attr.key.as_ref() {
            b"alias" => alias = Some(attr.unescape_value()?.to_string()),
            b"name" => name = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    let name =
        name.ok_or_else(|| Error::invalid_resource("assembly tag missing 'name'"))?;
    Ok(AssemblyRef { alias, name })
}

fn parse_data<R: BufRead>(
    e: &BytesStart,
    xml_reader: &mut Reader<R>,
    is_empty: bool,
) -> Result<Entry, Error> {
    let mut key = None;
    let mut type_name = None;
    let mut mime_type = None;

    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        match attr.key.as_ref() {
            b"name" => key = Some(attr.unescape_value()?.to_string()),
            b"type" => type_name = Some(attr.unescape_value()?.to_string()),
            b"mimetype" => mime_type = Some(attr.unescape_value()?.to_string()),
            _ => {}
        }
    }
    let key = key.ok_or_else(|| Error::invalid_resource("data tag missing 'name'"))?;

    let children = if is_empty {
        Children::default()
    } else {
        read_children(xml_reader, b"data")?
    };

    let file_ref = match (&type_name, &children.value) {
        (Some(t), Some(value)) if t.starts_with("System.Resources.ResXFileRef") => {
            Some(FileRef::parse(value)?)
        }
        _ => None,
    };

    Ok(Entry {
        key,
        value: children.value,
        comment: children.comment.unwrap_or_default(),
        type_name,
        mime_type,
        file_ref,
    })
}

#[derive(Default)]
struct Children {
    value: Option<String>,
    comment: Option<String>,
}

/// Reads the `<value>` and `<comment>` children up to the closing `end` tag.
fn read_children<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<Children, Error> {
    let mut children = Children::default();
    let mut buf = Vec::new();
    let mut skip_buf = Vec::new();

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Start(ref e) => match e.name().as_ref() {
                b"value" => children.value = Some(read_text(xml_reader, b"value")?),
                b"comment" => children.comment = Some(read_text(xml_reader, b"comment")?),
                _ => {
                    xml_reader.read_to_end_into(e.name(), &mut skip_buf)?;
                }
            },
            Event::Empty(ref e) => match e.name().as_ref() {
                b"value" => children.value = Some(String::new()),
                b"comment" => children.comment = Some(String::new()),
                _ => {}
            },
            Event::End(ref e) if e.name().as_ref() == end => break,
            Event::Eof => {
                return Err(Error::invalid_resource(format!(
                    "unexpected end of file inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
        skip_buf.clear();
    }

    Ok(children)
}

/// Collects the character data of a text-only element, whitespace included.
fn read_text<R: BufRead>(xml_reader: &mut Reader<R>, end: &[u8]) -> Result<String, Error> {
    let mut text = String::new();
    let mut buf = Vec::new();
    let mut depth = 0usize;

    loop {
        match xml_reader.read_event_into(&mut buf)? {
            Event::Text(e) if depth == 0 => text.push_str(&e.unescape()?),
            Event::CData(e) if depth == 0 => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Start(_) => depth += 1,
            Event::End(ref e) if depth == 0 && e.name().as_ref() == end => break,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Eof => {
                return Err(Error::invalid_resource(format!(
                    "unexpected end of file inside <{}>",
                    String::from_utf8_lossy(end)
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

fn write_text_element<W: Write>(
    xml_writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Error> {
    // An empty Start/End pair would pick up indentation whitespace on the way out.
    if text.is_empty() {
        xml_writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    xml_writer.write_event(Event::Start(BytesStart::new(name)))?;
    xml_writer.write_event(Event::Text(BytesText::new(text)))?;
    xml_writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_entry<W: Write>(xml_writer: &mut Writer<W>, entry: &Entry) -> Result<(), Error> {
    let mut elem = BytesStart::new("data");
    elem.push_attribute(("name", entry.key.as_str()));

    let type_name = match (&entry.type_name, &entry.file_ref) {
        (Some(t), _) => Some(t.as_str()),
        (None, Some(_)) => Some(FILE_REF_TYPE_NAME),
        (None, None) => None,
    };
    if let Some(t) = type_name {
        elem.push_attribute(("type", t));
    }
    if let Some(mime_type) = &entry.mime_type {
        elem.push_attribute(("mimetype", mime_type.as_str()));
    }
    if entry.is_text_string() {
        elem.push_attribute(("xml:space", "preserve"));
    }
    xml_writer.write_event(Event::Start(elem))?;

    let value = match &entry.file_ref {
        Some(file_ref) => Some(file_ref.to_string()),
        None => entry.value.clone(),
    };
    if let Some(value) = value {
        write_text_element(xml_writer, "value", &value)?;
    }
    if !entry.comment.is_empty() {
        write_text_element(xml_writer, "comment", &entry.comment)?;
    }

    xml_writer.write_event(Event::End(BytesEnd::new("data")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::STRING_TYPE_NAME;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<root>
  <xsd:schema id="root" xmlns="" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
    <xsd:element name="root" msdata:IsDataSet="true" />
  </xsd:schema>
  <resheader name="resmimetype">
    <value>text/microsoft-resx</value>
  </resheader>
  <resheader name="version">
    <value>2.0</value>
  </resheader>
  <assembly alias="System.Drawing" name="System.Drawing, Version=4.0.0.0" />
  <data name="Greeting" xml:space="preserve">
    <value>Hello {0} &amp; welcome</value>
    <comment>Shown on the start page</comment>
  </data>
  <data name="Padded" xml:space="preserve">
    <value>  spaced  </value>
  </data>
  <data name="Empty" xml:space="preserve">
    <value />
  </data>
  <data name="Logo" type="System.Resources.ResXFileRef, System.Windows.Forms">
    <value>..\Resources\logo.png;System.Drawing.Bitmap, System.Drawing</value>
  </data>
  <metadata name="toolTip.TrayLocation" type="System.Drawing.Point, System.Drawing">
    <value>17, 17</value>
  </metadata>
</root>
"#;

    #[test]
    fn test_parse_resx() {
        let format = Format::from_str(SAMPLE).unwrap();
        assert_eq!(format.entries.len(), 4);
        assert_eq!(format.headers.len(), 2);
        assert_eq!(format.assemblies.len(), 1);
        assert_eq!(format.assemblies[0].alias.as_deref(), Some("System.Drawing"));

        let greeting = &format.entries[0];
        assert_eq!(greeting.key, "Greeting");
        assert_eq!(greeting.value.as_deref(), Some("Hello {0} & welcome"));
        assert_eq!(greeting.comment, "Shown on the start page");
        assert!(greeting.is_text_string());

        assert_eq!(format.entries[1].value.as_deref(), Some("  spaced  "));
        assert_eq!(format.entries[2].value.as_deref(), Some(""));

        let logo = &format.entries[3];
        let file_ref = logo.file_ref.as_ref().unwrap();
        assert_eq!(file_ref.path, r"..\Resources\logo.png");
        assert_eq!(logo.declared_type(), "System.Drawing.Bitmap, System.Drawing");
        assert!(!logo.is_text_string());
    }

    #[test]
    fn test_parse_missing_name_is_error() {
        let xml = r#"<root><data><value>x</value></data></root>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::InvalidResource(_)));
    }

    #[test]
    fn test_parse_duplicate_key_is_error() {
        let xml = r#"<root>
            <data name="A"><value>1</value></data>
            <data name="A"><value>2</value></data>
        </root>"#;
        let err = Format::from_str(xml).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref key) if key == "A"));
    }

    #[test]
    fn test_parse_unterminated_data_is_error() {
        let xml = r#"<root><data name="A"><value>1</value>"#;
        assert!(Format::from_str(xml).is_err());
    }

    #[test]
    fn test_data_without_value() {
        let xml = r#"<root><data name="A" /><data name="B"><comment>c</comment></data></root>"#;
        let format = Format::from_str(xml).unwrap();
        assert_eq!(format.entries[0].value, None);
        assert_eq!(format.entries[1].value, None);
        assert_eq!(format.entries[1].comment, "c");
    }

    #[test]
    fn test_write_resx() {
        let format = Format::new(vec![
            Entry::text("Title", "Fish & <Chips>").with_comment("menu"),
            Entry::text("Blank", ""),
        ]);
        let mut out = Vec::new();
        format.to_writer(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        assert!(xml.contains(r#"<resheader name="resmimetype">"#));
        assert!(xml.contains("<value>text/microsoft-resx</value>"));
        assert!(xml.contains(r#"<data name="Title" xml:space="preserve">"#));
        assert!(xml.contains("<value>Fish &amp; &lt;Chips&gt;</value>"));
        assert!(xml.contains("<comment>menu</comment>"));
        assert!(xml.contains("<value/>") || xml.contains("<value />"));
    }

    #[test]
    fn test_write_preserves_space_on_strings_only() {
        let mut size = Entry::text("Button.Size", "75, 23");
        size.type_name = Some("System.Drawing.Size, System.Drawing".to_string());
        let mut logo = Entry::text("Logo", "");
        logo.value = None;
        logo.file_ref = Some(FileRef::parse(r"..\logo.png;System.Drawing.Bitmap, System.Drawing").unwrap());
        let mut qualified = Entry::text("Caption", "Hi");
        qualified.type_name = Some("System.String, mscorlib".to_string());

        let mut out = Vec::new();
        Format::new(vec![size, logo, qualified])
            .to_writer(&mut out)
            .unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains(
            r#"<data name="Button.Size" type="System.Drawing.Size, System.Drawing">"#
        ));
        assert!(xml.contains(&format!(r#"<data name="Logo" type="{FILE_REF_TYPE_NAME}">"#)));
        assert!(xml.contains(
            r#"<data name="Caption" type="System.String, mscorlib" xml:space="preserve">"#
        ));
    }

    #[test]
    fn test_write_then_read_preserves_modelled_fields() {
        let original = Format::from_str(SAMPLE).unwrap();
        let mut out = Vec::new();
        original.to_writer(&mut out).unwrap();
        let reread = Format::from_bytes(&out).unwrap();

        assert_eq!(reread.entries, original.entries);
        assert_eq!(reread.assemblies, original.assemblies);
        assert_eq!(reread.headers.len(), 4);
        assert_eq!(reread.entries[0].declared_type(), STRING_TYPE_NAME);
    }

    #[test]
    fn test_project_resources_detection() {
        assert!(is_project_resources_file(Path::new(
            "src/App/Properties/Resources.resx"
        )));
        assert!(!is_project_resources_file(Path::new("src/App/Resources.resx")));
        assert!(!is_project_resources_file(Path::new(
            "src/App/Properties/Strings.resx"
        )));
    }

    #[test]
    fn test_resolve_file_ref_uses_base_path() {
        let mut format = Format::from_str(SAMPLE).unwrap();
        let file_ref = format.entries[3].file_ref.clone().unwrap();

        let resolved = format.resolve_file_ref(&file_ref, Path::new("/proj/Forms"));
        assert_eq!(resolved, Path::new("/proj/Forms/../Resources/logo.png"));

        format.base_path = Some(PathBuf::from("/proj/Properties"));
        let resolved = format.resolve_file_ref(&file_ref, Path::new("/proj/Forms"));
        assert_eq!(resolved, Path::new("/proj/Properties/../Resources/logo.png"));
    }
}

//! Common test utilities for integration tests

use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test ZIP file with specified files
#[allow(dead_code)]
pub fn create_test_zip(
    zip_path: &Path,
    files: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for (name, content) in files {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

/// Helper function to create a `.ggb` archive holding `geogebra.xml`
#[allow(dead_code)]
pub fn create_test_ggb(ggb_path: &Path, descriptor: &str) {
    if let Some(parent) = ggb_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    create_test_zip(
        ggb_path,
        &[
            ("geogebra_javascript.js", "function ggbOnInit() {}"),
            ("geogebra.xml", descriptor),
        ],
    )
    .unwrap();
}

/// Descriptor with two points and one line
#[allow(dead_code)]
pub const TWO_POINTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<geogebra format="5.0" version="5.0.680.0" app="classic">
<euclidianView>
  <size width="1200" height="800"/>
</euclidianView>
<construction title="" author="" date="">
  <element type="point" label="A">
    <show object="true" label="true"/>
    <objColor r="77" g="77" b="255" alpha="0.0"/>
    <coords x="1.5" y="-2.0" z="1.0"/>
    <pointSize val="5"/>
  </element>
  <element type="line" label="f">
    <coords x="1.0" y="-1.0" z="0.0"/>
  </element>
  <element type="point" label="B">
    <coords x="0" y="0" z="1.0"/>
  </element>
</construction>
</geogebra>"#;

/// Descriptor with a point that has no coords child
#[allow(dead_code)]
pub const MISSING_COORDS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<geogebra format="5.0">
<construction>
  <element type="point" label="Lonely">
    <show object="true" label="true"/>
  </element>
</construction>
</geogebra>"#;

/// Descriptor with points that are skipped for different reasons
#[allow(dead_code)]
pub const MIXED_POINTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<geogebra format="5.0">
<construction>
  <element type="point" label="Bad">
    <coords x="abc" y="1.0" z="1.0"/>
  </element>
  <element type="point" label="EmptyX">
    <coords x="" y="1.0" z="1.0"/>
  </element>
  <element type="point" label="NoY">
    <coords x="2.0" z="1.0"/>
  </element>
  <element type="point" label="Good">
    <coords x="3.25" y="4.75" z="1.0"/>
  </element>
</construction>
</geogebra>"#;

/// Descriptor without any point element
#[allow(dead_code)]
pub const NO_POINTS_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<geogebra format="5.0">
<construction>
  <element type="circle" label="c">
    <coords x="1" y="1" z="1"/>
  </element>
</construction>
</geogebra>"#;

/// Builds a descriptor with `count` points labeled `P0..`
#[allow(dead_code)]
pub fn many_points_xml(count: usize) -> String {
    let mut xml = String::from("<geogebra><construction>");
    for i in 0..count {
        xml.push_str(&format!(
            r#"<element type="point" label="P{i}"><coords x="{i}.5" y="-{i}" z="1"/></element>"#
        ));
    }
    xml.push_str("</construction></geogebra>");
    xml
}

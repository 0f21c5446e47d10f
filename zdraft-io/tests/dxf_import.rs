
use std::path::PathBuf;

use golden::assert_golden;
use zdraft_core::document::Shape;
use zdraft_core::style::{LineType, Rgb, StyleAttributes};
use zdraft_io::{
    DocumentLoader, DxfFacade, ImportError, ImportOptions, IoError, import_document,
    import_document_with,
};

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/data");
    path.push(name);
    path
}

#[test]
fn load_basic_shapes_matches_expected_document() {
    let loader = DxfFacade::new();
    let doc = loader.load(&fixture("basic_shapes.dxf")).expect("读取 DXF 失败");
    assert_golden("basic_shapes", &doc);
}

#[test]
fn load_polyline_and_spline_matches_expected_document() {
    let loader = DxfFacade::new();
    let doc = loader
        .load(&fixture("polyline_spline.dxf"))
        .expect("读取 POLYLINE/SPLINE DXF 失败");
    assert_golden("polyline_spline", &doc);
}

#[test]
fn imported_document_fits_target_size() {
    let loader = DxfFacade::new();
    let doc = loader.load(&fixture("basic_shapes.dxf")).expect("读取 DXF 失败");
    let bounds = doc.bounds().expect("文档不应为空");
    assert!((bounds.width() - 1000.0).abs() < 1e-9);
    assert!((bounds.height() - 400.0).abs() < 1e-9);
    let center = bounds.center();
    assert!(center.x().abs() < 1e-9);
    assert!(center.y().abs() < 1e-9);
}

#[test]
fn custom_options_change_scale_and_fallback_style() {
    let options = ImportOptions {
        target_size: 10.0,
        default_style: StyleAttributes::default().with_color(Rgb::MAGENTA),
    };
    let data = std::fs::read(fixture("basic_shapes.dxf")).expect("读取夹具失败");
    let shapes = import_document_with(&data, &options).expect("导入失败");
    assert_eq!(shapes.len(), 4);

    let Shape::Line(line) = &shapes[0] else {
        panic!("第一个图形应为直线");
    };
    assert!((line.start.x() + 5.0).abs() < 1e-12);
    assert!((line.end.x() - 5.0).abs() < 1e-12);
    assert_eq!(line.style.color, Rgb::RED);
    assert_eq!(line.style.line_type, LineType::Dash);

    // 矩形没有颜色组码，沿用默认样式的颜色
    let Shape::Rectangle(rectangle) = &shapes[2] else {
        panic!("第三个图形应为矩形");
    };
    assert_eq!(rectangle.style.color, Rgb::MAGENTA);
    assert!((rectangle.rect.width - 10.0).abs() < 1e-12);
}

#[test]
fn malformed_input_yields_no_shapes() {
    let truncated = "0\nSECTION\n2\nENTITIES\n0\nLINE\n10\n0.0\n20\n";
    assert!(matches!(
        import_document(truncated.as_bytes()),
        Err(ImportError::Malformed(_))
    ));

    let missing_eof = "0\nSECTION\n2\nENTITIES\n0\nENDSEC\n";
    assert!(matches!(
        import_document(missing_eof.as_bytes()),
        Err(ImportError::Malformed(_))
    ));

    let bad_number = "0\nSECTION\n2\nENTITIES\n0\nCIRCLE\n10\nabc\n20\n0.0\n40\n1.0\n0\nENDSEC\n0\nEOF\n";
    let Err(ImportError::Malformed(message)) = import_document(bad_number.as_bytes()) else {
        panic!("非法数值应导致解析失败");
    };
    assert!(message.contains("abc"), "错误信息应包含原始值: {message}");
}

#[test]
fn empty_entities_section_imports_nothing() {
    let source = "0\nSECTION\n2\nENTITIES\n0\nENDSEC\n0\nEOF\n";
    let shapes = import_document(source.as_bytes()).expect("空文档应可导入");
    assert!(shapes.is_empty());
}

#[test]
fn missing_file_reports_read_error() {
    let loader = DxfFacade::new();
    let err = loader
        .load(&fixture("does_not_exist.dxf"))
        .expect_err("不存在的文件应报错");
    assert!(matches!(err, IoError::ReadError { .. }));
}

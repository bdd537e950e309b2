use std::fs;
use std::path::Path;

use declgen::WrapperConfig;
use declgen::wrapper::{emit_header, emit_source, generate_tree};
use declscan::{ParseMode, Parser, SourceUnit};
use pretty_assertions::assert_eq;

fn types_of(text: &str) -> Vec<declscan::TypeDecl> {
    let unit = SourceUnit::new("widget.h", text, 0);
    Parser::new(&unit).parse(ParseMode::TypesAndRoutines).unwrap().types
}

#[test]
fn header_declares_handle_factory_and_destroy() {
    let types = types_of("class Widget {\npublic:\n    Widget();\n};\n");
    let header = emit_header(&types, &WrapperConfig::default());

    assert_eq!(
        header,
        "#pragma once\n\
         \n\
         #ifdef __cplusplus\n\
         extern \"C\" {\n\
         #endif\n\
         \n\
         struct smlt_widget_t;\n\
         \n\
         smlt_widget_t* smlt_widget_create();\n\
         smlt_widget_t* smlt_widget_destroy(smlt_widget_t* widget);\n\
         \n\
         #ifdef __cplusplus\n\
         }\n\
         #endif\n"
    );
}

#[test]
fn source_includes_umbrella_and_original_header() {
    let types = types_of("class Widget { };\n");
    let source = emit_source(&types, Path::new("ui/widget.h"), &WrapperConfig::default());

    assert_eq!(
        source,
        "#include <simulant/simulant.h>\n\
         #include \"./ui/widget.h\"\n\
         \n\
         smlt_widget_t* smlt_widget_create() {\n\
         \x20   return new Widget();\n\
         }\n"
    );
}

#[test]
fn one_create_and_destroy_per_type() {
    let types = types_of("class MeshLoader { };\nstruct Vec3 { float x; };\n");
    let header = emit_header(&types, &WrapperConfig::default());

    assert_eq!(header.matches("smlt_meshloader_create();").count(), 1);
    assert_eq!(header.matches("smlt_meshloader_destroy(").count(), 1);
    assert_eq!(header.matches("smlt_vec3_create();").count(), 1);
    assert_eq!(header.matches("smlt_vec3_destroy(").count(), 1);
}

#[test]
fn symbol_prefix_is_configurable() {
    let config = WrapperConfig {
        symbol_prefix: "eng_".to_string(),
        umbrella_header: "engine/engine.h".to_string(),
        ..WrapperConfig::default()
    };
    let types = types_of("class Camera { };\n");

    assert!(emit_header(&types, &config).contains("eng_camera_t* eng_camera_create();"));
    assert!(emit_source(&types, Path::new("camera.h"), &config).starts_with("#include <engine/engine.h>\n"));
}

#[test]
fn tree_is_mirrored_under_destination() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::create_dir_all(src.path().join("nodes")).unwrap();
    fs::write(src.path().join("nodes/actor.h"), "class Actor : public Node {\n};\n").unwrap();
    fs::write(src.path().join("window.h"), "class Window { };\n").unwrap();
    fs::write(src.path().join("window.cpp"), "class Ignored { };\n").unwrap();
    fs::write(src.path().join("broken.h"), "class Broken {\n").unwrap();

    let report = generate_tree(src.path(), dest.path(), &WrapperConfig::default()).unwrap();

    let actor_header = fs::read_to_string(dest.path().join("nodes/actor.h")).unwrap();
    let actor_source = fs::read_to_string(dest.path().join("nodes/actor.cpp")).unwrap();
    assert!(actor_header.contains("smlt_actor_t* smlt_actor_create();"));
    assert!(actor_source.contains("#include \"./nodes/actor.h\""));
    assert!(actor_source.contains("return new Actor();"));

    let window_source = fs::read_to_string(dest.path().join("window.cpp")).unwrap();
    assert!(window_source.contains("return new Window();"));
    assert!(!window_source.contains("Ignored"));
    assert!(!dest.path().join("broken.h").exists());

    assert_eq!(report.generated.len(), 4);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].unit.path.ends_with("broken.h"));
}

#[test]
fn latin1_header_does_not_stop_the_walk() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::write(src.path().join("a_latin1.h"), b"// caf\xe9\nclass A { };\n").unwrap();
    fs::write(src.path().join("b_ok.h"), "class B { };\n").unwrap();

    let report = generate_tree(src.path(), dest.path(), &WrapperConfig::default()).unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.generated.len(), 4);
    let a_source = fs::read_to_string(dest.path().join("a_latin1.cpp")).unwrap();
    let b_source = fs::read_to_string(dest.path().join("b_ok.cpp")).unwrap();
    assert!(a_source.contains("return new A();"));
    assert!(b_source.contains("return new B();"));
}

#[test]
fn header_without_types_still_gets_a_wrapper_pair() {
    let src = tempfile::tempdir().unwrap();
    let dest = tempfile::tempdir().unwrap();
    fs::write(src.path().join("math.h"), "float lerp(float a, float b, float t);\n").unwrap();

    let report = generate_tree(src.path(), dest.path(), &WrapperConfig::default()).unwrap();

    assert_eq!(report.generated.len(), 2);
    let header = fs::read_to_string(dest.path().join("math.h")).unwrap();
    assert!(!header.contains("struct "));
}

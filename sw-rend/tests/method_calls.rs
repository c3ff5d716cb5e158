use sw_rend::{
    HeadlessRegistry, MethodCall, MethodResponse, SwRendPlugin, TextureId, TextureRegistry, Value,
};

const RED: [u8; 4] = [255, 0, 0, 255];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn call<R: TextureRegistry>(plugin: &mut SwRendPlugin<R>, call: MethodCall) -> Value {
    let method = call.method.clone();
    match plugin.handle_method_call(&call) {
        MethodResponse::Success(value) => value,
        other => panic!("`{method}` failed: {other:?}"),
    }
}

fn error_code<R: TextureRegistry>(plugin: &mut SwRendPlugin<R>, call: MethodCall) -> String {
    match plugin.handle_method_call(&call) {
        MethodResponse::Error { code, .. } => code,
        other => panic!("expected an error, got {other:?}"),
    }
}

fn init(width: i64, height: i64) -> MethodCall {
    MethodCall::new("init")
        .with_argument("width", width)
        .with_argument("height", height)
}

fn on_texture(method: &str, texture: &Value) -> MethodCall {
    MethodCall::new(method).with_argument("texture", texture.clone())
}

#[test]
fn solid_red_scenario() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());

    let texture = call(&mut plugin, init(2, 2));
    assert!(matches!(texture, Value::Int(_)));

    let draw = on_texture("draw", &texture)
        .with_argument("pixels", RED.repeat(4))
        .with_argument("x", 0)
        .with_argument("y", 0)
        .with_argument("width", 2)
        .with_argument("height", 2);
    assert_eq!(call(&mut plugin, draw), Value::Null);

    let pixels = call(&mut plugin, on_texture("get_pixels", &texture));
    let pixels = pixels.as_bytes().expect("byte list");
    assert_eq!(pixels.len(), 16);
    assert!(pixels.chunks_exact(4).all(|quad| quad == RED));

    assert_eq!(
        call(&mut plugin, on_texture("get_size", &texture)),
        Value::Int32List(vec![2, 2])
    );

    assert_eq!(call(&mut plugin, on_texture("dispose", &texture)), Value::Null);
    assert_eq!(
        error_code(&mut plugin, on_texture("get_size", &texture)),
        "UNKNOWN_TEXTURE"
    );
}

#[test]
fn fresh_textures_read_back_as_zeroes() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());

    for (w, h) in [(0, 0), (1, 3), (7, 5)] {
        let texture = call(&mut plugin, init(w, h));
        assert_eq!(
            call(&mut plugin, on_texture("get_pixels", &texture)),
            Value::Uint8List(vec![0; (w * h * 4) as usize])
        );
    }
}

#[test]
fn draw_without_rect_overwrites_whole_buffer() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let texture = call(&mut plugin, init(3, 1));
    let pixels: Vec<u8> = (0..12).collect();

    call(
        &mut plugin,
        on_texture("draw", &texture).with_argument("pixels", pixels.clone()),
    );

    assert_eq!(
        call(&mut plugin, on_texture("get_pixels", &texture)),
        Value::Uint8List(pixels)
    );
}

#[test]
fn clipped_draw_touches_only_last_column() {
    init_logger();
    let (w, h) = (4_i64, 3_i64);
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let texture = call(&mut plugin, init(w, h));

    let draw = on_texture("draw", &texture)
        .with_argument("pixels", [7_u8; 4].repeat((10 * h) as usize))
        .with_argument("x", w - 1)
        .with_argument("y", 0)
        .with_argument("width", 10)
        .with_argument("height", h);
    call(&mut plugin, draw);

    let pixels = call(&mut plugin, on_texture("get_pixels", &texture));
    let pixels = pixels.as_bytes().expect("byte list");
    for (index, quad) in pixels.chunks_exact(4).enumerate() {
        let column = index as i64 % w;
        let expected = if column == w - 1 { [7; 4] } else { [0; 4] };
        assert_eq!(quad, expected, "pixel {index}");
    }
}

#[test]
fn invalidate_reaches_the_host() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let texture = call(&mut plugin, init(1, 1));
    let handle = TextureId::new(texture.as_int().expect("integer handle"));

    call(
        &mut plugin,
        on_texture("draw", &texture).with_argument("pixels", RED.to_vec()),
    );
    call(&mut plugin, on_texture("invalidate", &texture));

    let registry = plugin.manager().registry();
    assert_eq!(registry.frames_available(handle), Some(1));
    assert_eq!(
        registry.pull(handle).map(|frame| frame.data),
        Some(RED.to_vec())
    );
}

#[test]
fn list_textures_after_dispose() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let a = call(&mut plugin, init(1, 1));
    let b = call(&mut plugin, init(1, 1));

    call(&mut plugin, on_texture("dispose", &a));

    let listed = call(&mut plugin, MethodCall::new("list_textures"));
    assert_eq!(listed, Value::Int64List(vec![b.as_int().expect("integer handle")]));
}

#[test]
fn every_operation_fails_after_dispose() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let texture = call(&mut plugin, init(2, 2));
    call(&mut plugin, on_texture("dispose", &texture));

    for method in ["invalidate", "get_pixels", "get_size", "get_texture_id", "dispose"] {
        assert_eq!(
            error_code(&mut plugin, on_texture(method, &texture)),
            "UNKNOWN_TEXTURE",
            "{method}"
        );
    }
    let draw = on_texture("draw", &texture).with_argument("pixels", RED.to_vec());
    assert_eq!(error_code(&mut plugin, draw), "UNKNOWN_TEXTURE");
}

#[test]
fn registration_failure_is_reported_and_isolated() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::with_capacity_limit(1));
    let kept = call(&mut plugin, init(1, 1));

    assert_eq!(error_code(&mut plugin, init(1, 1)), "REGISTRATION_FAILED");

    assert_eq!(
        call(&mut plugin, MethodCall::new("list_textures")),
        Value::Int64List(vec![kept.as_int().expect("integer handle")])
    );
    assert_eq!(
        call(&mut plugin, on_texture("get_size", &kept)),
        Value::Int32List(vec![1, 1])
    );
}

#[test]
fn dispose_all_releases_host_textures() {
    init_logger();
    let mut plugin = SwRendPlugin::new(HeadlessRegistry::new());
    let texture = call(&mut plugin, init(2, 2));
    let handle = TextureId::new(texture.as_int().expect("integer handle"));
    assert!(plugin.manager().registry().pull(handle).is_some());

    plugin.manager_mut().dispose_all();
    assert!(plugin.manager().registry().is_empty());
    assert_eq!(plugin.manager().registry().pull(handle), None);
}

use skyhour::{FadePolicy, GenerationConfig, Rgb8, SkyPalette, fade_ratio, make_gradient};

fn config_json() -> &'static str {
    r#"{
        "sky_colours": {
            "0": [10, 10, 40],
            "12": [255, 220, 130],
            "21": [25, 20, 60]
        },
        "name": "Rosa"
    }"#
}

#[test]
fn palette_samples_follow_the_config_table() {
    let cfg = GenerationConfig::from_reader(config_json().as_bytes()).unwrap();
    let palette = cfg.palette().unwrap();

    assert_eq!(palette.colour_at(0.0).unwrap(), Rgb8::new(10, 10, 40));
    assert_eq!(palette.colour_at(12.0).unwrap(), Rgb8::new(255, 220, 130));
    assert_eq!(palette.colour_at(21.0).unwrap(), Rgb8::new(25, 20, 60));

    // Halfway between the 0h and 12h control points.
    assert_eq!(palette.colour_at(6.0).unwrap(), Rgb8::new(133, 115, 85));

    // Before the first and after the last key the ends hold.
    assert_eq!(palette.colour_at(-1.0).unwrap(), Rgb8::new(10, 10, 40));
    assert_eq!(palette.colour_at(23.0).unwrap(), Rgb8::new(25, 20, 60));
}

#[test]
fn config_errors_name_the_culprit() {
    let one_entry = r#"{ "sky_colours": { "3": [1, 2, 3] }, "name": "Rosa" }"#;
    let err = GenerationConfig::from_reader(one_entry.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("at least 2"), "{err}");

    let bad_key = r#"{
        "sky_colours": { "noon": [1, 2, 3], "4": [0, 0, 0] },
        "name": "Rosa"
    }"#;
    let err = GenerationConfig::from_reader(bad_key.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("noon"), "{err}");

    let dup_hour = SkyPalette::new(vec![
        (4, Rgb8::splat(1)),
        (4, Rgb8::splat(2)),
        (9, Rgb8::splat(3)),
    ]);
    let err = dup_hour.unwrap_err();
    assert!(err.to_string().contains("duplicate"), "{err}");
}

#[test]
fn gradient_fades_into_the_monochrome_average() {
    let cfg = GenerationConfig::from_reader(config_json().as_bytes()).unwrap();
    let palette = cfg.palette().unwrap();
    let colour = palette.colour_at(12.0).unwrap();

    let canvas = skyhour::Canvas::new(400, 400).unwrap();
    let frame = make_gradient(colour, canvas, FadePolicy::BrightnessScaled);
    assert_eq!(frame.data.len(), 400 * 400 * 4);

    // mean(255, 220, 130) = 201.67 -> ratio 0.1 + 0.4 * (1 - 201.67/255)
    let fade_rows = (400.0 * fade_ratio(colour, FadePolicy::BrightnessScaled)).floor() as u32;
    assert!(fade_rows > 0 && fade_rows < 200);

    let first_fade_row = 400 - fade_rows;
    assert_eq!(frame.pixel(200, 0), [255, 220, 130, 255]);
    assert_eq!(frame.pixel(200, first_fade_row - 1), [255, 220, 130, 255]);
    assert_eq!(frame.pixel(200, first_fade_row), [255, 220, 130, 255]);
    assert_eq!(frame.pixel(200, 399), [201, 201, 201, 255]);

    // Rows inside the fade shrink monotonically toward the average.
    let mut last_r = 255u8;
    for y in first_fade_row..400 {
        let px = frame.pixel(200, y);
        assert!(px[0] <= last_r);
        assert_eq!(px[3], 255);
        last_r = px[0];
    }
}

#[test]
fn dark_hours_fade_further_than_bright_ones() {
    let cfg = GenerationConfig::from_reader(config_json().as_bytes()).unwrap();
    let palette = cfg.palette().unwrap();

    let midnight = fade_ratio(palette.colour_at(0.0).unwrap(), FadePolicy::BrightnessScaled);
    let noon = fade_ratio(palette.colour_at(12.0).unwrap(), FadePolicy::BrightnessScaled);
    assert!(midnight > noon);

    let fixed = fade_ratio(palette.colour_at(0.0).unwrap(), FadePolicy::Fixed);
    assert_eq!(fixed, 0.3);
}

use crate::config::DEFAULT_CUSTOM_SIZE;
use crate::core::Preset;
use crate::preset;

/// プリセット一覧の1行
pub fn describe_preset(preset: Preset) -> String {
    match preset::resolve(preset, None, None) {
        Ok(target) => format!(
            "{:<20} {}x{} px @ {} DPI",
            preset.label(),
            target.width,
            target.height,
            target.dpi
        ),
        Err(_) => format!(
            "{:<20} --width/--height で指定 (デフォルト {}x{} px @ {} DPI)",
            preset.label(),
            DEFAULT_CUSTOM_SIZE.0,
            DEFAULT_CUSTOM_SIZE.1,
            preset::DISPLAY_DPI
        ),
    }
}

/// List available presets
pub fn execute_presets() {
    println!("📐 利用可能なプリセット:");
    for preset in Preset::ALL {
        println!("   {}", describe_preset(preset));
    }
}

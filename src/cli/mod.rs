// CLI層 - コマンドライン引数の定義と処理
// ユーザーインターフェースとバッチ処理コアの橋渡し

pub mod args;
pub mod commands;
pub mod input;

// 公開API
pub use args::*;
pub use commands::*;
pub use input::collect_inputs;

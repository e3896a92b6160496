// テスト用ユーティリティ

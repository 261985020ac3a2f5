//! Repository trait 定義
//!
//! ドメイン層が必要とするルームレジストリへのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{JoinRejection, PlayerId, RepositoryError, Room, RoomCode};

/// Room Repository trait（ルームレジストリ）
///
/// ルームコード → ルーム状態の対応を管理する。ルームの存在と定員についての
/// 唯一の情報源であり、各接続の役割は `Participation` 側が持つ。
///
/// ## 並行性
///
/// 複数の接続から同時に呼ばれるため、読み取り → 更新を伴う操作
/// （`create_room`, `claim_guest_seat`, `remove_room`, `clear_guest`）は
/// 実装側で 1 回のロック取得内に完結させること。
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを登録する
    ///
    /// 同じコードのルームが既に存在する場合は黙って上書きし、上書き前のルームを返す。
    async fn create_room(&self, room: Room) -> Option<Room>;

    /// ルームを削除する（存在しなくてもエラーにしない）
    async fn remove_room(&self, code: &RoomCode) -> Option<Room>;

    /// ルームを取得
    async fn get_room(&self, code: &RoomCode) -> Option<Room>;

    /// 既存ルームのゲストを設定する（レジストリの基本操作 `setGuest`）
    ///
    /// 空席かどうかは呼び出し側の責務。`claim_guest_seat` はこの操作の前に
    /// 存在・空席チェックを同じロック内で行うもので、参加処理はそちらを使う。
    async fn set_guest(&self, code: &RoomCode, guest: PlayerId) -> Result<(), RepositoryError>;

    /// ゲストをクリアする（ルーム・ゲストが存在しなくてもエラーにしない）
    async fn clear_guest(&self, code: &RoomCode);

    /// ルームの存在・空席チェックとゲスト設定をアトミックに行う
    async fn claim_guest_seat(&self, code: &RoomCode, guest: PlayerId)
    -> Result<Room, JoinRejection>;

    /// 全ルームをルームコード順で取得
    async fn list_rooms(&self) -> Vec<Room>;
}

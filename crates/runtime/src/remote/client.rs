//! Remote game action client.
//!
//! One async method per primitive action the game server accepts. Every
//! action answers with the character's fresh snapshot and the cooldown the
//! server imposed, or with a [`ClientError`] from a small closed taxonomy.
use std::time::Duration;

use async_trait::async_trait;
use game_core::{Character, ErrorKind, ItemStack, Position, Slot};
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("insufficient resource: {0}")]
    InsufficientResource(String),

    #[error("insufficient skill: {0}")]
    InsufficientSkill(String),

    #[error("an action is already in progress")]
    AlreadyInProgress,

    #[error("character is on cooldown for {0:?}")]
    OnCooldown(Duration),

    #[error("at capacity: {0}")]
    AtCapacity(String),

    #[error("remote failure: {0}")]
    Generic(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::InsufficientSkill(_) => ErrorKind::InsufficientSkill,
            Self::AlreadyInProgress => ErrorKind::AlreadyInProgress,
            Self::OnCooldown(_) => ErrorKind::OnCooldown,
            Self::InsufficientResource(_) | Self::AtCapacity(_) | Self::Generic(_) => {
                ErrorKind::Generic
            }
        }
    }
}

/// Summary of a fight the server resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FightReport {
    pub monster: String,
    pub won: bool,
    pub turns: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub character: Character,
    pub cooldown: Duration,
    pub drops: Vec<ItemStack>,
    pub fight: Option<FightReport>,
}

impl ActionResponse {
    pub fn new(character: Character, cooldown: Duration) -> Self {
        Self {
            character,
            cooldown,
            drops: Vec::new(),
            fight: None,
        }
    }

    pub fn dropped(&self, code: &str) -> u32 {
        self.drops
            .iter()
            .filter(|stack| stack.code == code)
            .map(|stack| stack.quantity)
            .sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BankContents {
    pub items: Vec<ItemStack>,
    pub gold: u32,
}

/// A primitive action, as a value.
///
/// Jobs describe what they want done with this enum so the cooldown and
/// cancellation gate can wrap every call uniformly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    Move(Position),
    Transition,
    Fight,
    Gather,
    Craft { code: String, quantity: u32 },
    Rest,
    Equip { code: String, slot: Slot, quantity: u32 },
    Unequip { slot: Slot, quantity: u32 },
    UseItem { code: String, quantity: u32 },
    DepositItem { code: String, quantity: u32 },
    WithdrawItem { code: String, quantity: u32 },
    DepositGold(u32),
    WithdrawGold(u32),
    NpcBuy { code: String, quantity: u32 },
    NpcSell { code: String, quantity: u32 },
    TaskNew,
    TaskTrade { code: String, quantity: u32 },
    TaskComplete,
    TaskCancel,
    TaskExchange,
}

impl RemoteAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Move(_) => "move",
            Self::Transition => "transition",
            Self::Fight => "fight",
            Self::Gather => "gather",
            Self::Craft { .. } => "craft",
            Self::Rest => "rest",
            Self::Equip { .. } => "equip",
            Self::Unequip { .. } => "unequip",
            Self::UseItem { .. } => "use_item",
            Self::DepositItem { .. } => "deposit_item",
            Self::WithdrawItem { .. } => "withdraw_item",
            Self::DepositGold(_) => "deposit_gold",
            Self::WithdrawGold(_) => "withdraw_gold",
            Self::NpcBuy { .. } => "npc_buy",
            Self::NpcSell { .. } => "npc_sell",
            Self::TaskNew => "task_new",
            Self::TaskTrade { .. } => "task_trade",
            Self::TaskComplete => "task_complete",
            Self::TaskCancel => "task_cancel",
            Self::TaskExchange => "task_exchange",
        }
    }
}

/// The remote game server, as seen by the bot.
#[async_trait]
pub trait GameClient: Send + Sync {
    /// Current snapshot of a character.
    async fn character(&self, name: &str) -> ClientResult<Character>;

    /// Contents of the shared bank.
    async fn bank_items(&self) -> ClientResult<BankContents>;

    async fn move_to(&self, name: &str, position: Position) -> ClientResult<ActionResponse>;

    /// Takes the transition on the character's tile.
    async fn transition(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn fight(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn gather(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn craft(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse>;

    async fn rest(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn equip(
        &self,
        name: &str,
        code: &str,
        slot: Slot,
        quantity: u32,
    ) -> ClientResult<ActionResponse>;

    async fn unequip(&self, name: &str, slot: Slot, quantity: u32) -> ClientResult<ActionResponse>;

    async fn use_item(&self, name: &str, code: &str, quantity: u32)
    -> ClientResult<ActionResponse>;

    async fn deposit_item(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse>;

    async fn withdraw_item(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse>;

    async fn deposit_gold(&self, name: &str, amount: u32) -> ClientResult<ActionResponse>;

    async fn withdraw_gold(&self, name: &str, amount: u32) -> ClientResult<ActionResponse>;

    async fn npc_buy(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse>;

    async fn npc_sell(&self, name: &str, code: &str, quantity: u32)
    -> ClientResult<ActionResponse>;

    async fn task_new(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn task_trade(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse>;

    async fn task_complete(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn task_cancel(&self, name: &str) -> ClientResult<ActionResponse>;

    async fn task_exchange(&self, name: &str) -> ClientResult<ActionResponse>;

    /// Dispatches a [`RemoteAction`] to the matching method.
    async fn perform(&self, name: &str, action: &RemoteAction) -> ClientResult<ActionResponse> {
        match action {
            RemoteAction::Move(position) => self.move_to(name, *position).await,
            RemoteAction::Transition => self.transition(name).await,
            RemoteAction::Fight => self.fight(name).await,
            RemoteAction::Gather => self.gather(name).await,
            RemoteAction::Craft { code, quantity } => self.craft(name, code, *quantity).await,
            RemoteAction::Rest => self.rest(name).await,
            RemoteAction::Equip {
                code,
                slot,
                quantity,
            } => self.equip(name, code, *slot, *quantity).await,
            RemoteAction::Unequip { slot, quantity } => self.unequip(name, *slot, *quantity).await,
            RemoteAction::UseItem { code, quantity } => self.use_item(name, code, *quantity).await,
            RemoteAction::DepositItem { code, quantity } => {
                self.deposit_item(name, code, *quantity).await
            }
            RemoteAction::WithdrawItem { code, quantity } => {
                self.withdraw_item(name, code, *quantity).await
            }
            RemoteAction::DepositGold(amount) => self.deposit_gold(name, *amount).await,
            RemoteAction::WithdrawGold(amount) => self.withdraw_gold(name, *amount).await,
            RemoteAction::NpcBuy { code, quantity } => self.npc_buy(name, code, *quantity).await,
            RemoteAction::NpcSell { code, quantity } => self.npc_sell(name, code, *quantity).await,
            RemoteAction::TaskNew => self.task_new(name).await,
            RemoteAction::TaskTrade { code, quantity } => {
                self.task_trade(name, code, *quantity).await
            }
            RemoteAction::TaskComplete => self.task_complete(name).await,
            RemoteAction::TaskCancel => self.task_cancel(name).await,
            RemoteAction::TaskExchange => self.task_exchange(name).await,
        }
    }
}


//! In-memory game server.
//!
//! [`OfflineClient`] plays the server's part against the static catalog: it
//! keeps character snapshots and the shared bank, checks every action against
//! the tile the character stands on, resolves fights with the combat
//! simulator and hands out drops on a fixed schedule, so a run with the same
//! inputs always produces the same outcome. Tests queue failures with
//! [`OfflineClient::fail_next`].
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use game_core::{
    Character, CombatTuning, ContentKind, Drop, EffectKind, EquippedItem, FightSimulator, Fighter,
    ItemStack, Layer, MapContent, Position, Skill, Slot, TaskKind, TaskProgress, Winner,
};

use super::client::{
    ActionResponse, BankContents, ClientError, ClientResult, FightReport, GameClient,
};
use crate::jobs::kinds::{TASK_CANCEL_COST, TASK_EXCHANGE_COST, TASKS_COIN};
use crate::oracle::WorldState;

/// Units required by a task handed out without configured offers.
const DEFAULT_TASK_TOTAL: u32 = 10;
const TASK_REWARD_COINS: u32 = 2;
const TASK_REWARD_GOLD: u32 = 50;
const EXCHANGE_REWARD_GOLD: u32 = 200;

#[derive(Default)]
struct OfflineState {
    characters: HashMap<String, Character>,
    bank: BTreeMap<String, u32>,
    bank_gold: u32,
    failures: HashMap<String, VecDeque<ClientError>>,
    /// Attempts per (character, source, item), driving the drop schedule.
    attempts: HashMap<(String, String, String), u32>,
    /// Successful actions per (character, skill) since the last level.
    experience: HashMap<(String, Skill), u32>,
    task_offers: HashMap<TaskKind, Vec<ItemStack>>,
    handed_out: HashMap<(String, TaskKind), usize>,
    log: HashMap<String, Vec<&'static str>>,
}

impl OfflineState {
    fn roll(&mut self, name: &str, source: &str, drop: &Drop) -> Option<ItemStack> {
        let attempts = self
            .attempts
            .entry((name.to_owned(), source.to_owned(), drop.code.clone()))
            .or_default();
        *attempts += 1;
        if *attempts % drop.rate.max(1) != 0 {
            return None;
        }
        let spread = drop.max_quantity - drop.min_quantity + 1;
        let quantity = drop.min_quantity + (*attempts / drop.rate.max(1)) % spread;
        (quantity > 0).then(|| ItemStack::new(drop.code.clone(), quantity))
    }
}

/// What an action produced besides the new snapshot.
#[derive(Default)]
struct Produced {
    drops: Vec<ItemStack>,
    fight: Option<FightReport>,
}

pub struct OfflineClient {
    world: WorldState,
    simulator: FightSimulator,
    cooldown: Duration,
    actions_per_level: Option<u32>,
    state: Mutex<OfflineState>,
}

impl OfflineClient {
    pub fn new(world: WorldState) -> Self {
        Self::with_tuning(world, CombatTuning::default())
    }

    pub fn with_tuning(world: WorldState, tuning: CombatTuning) -> Self {
        Self {
            world,
            simulator: FightSimulator::new(tuning),
            cooldown: Duration::ZERO,
            actions_per_level: None,
            state: Mutex::new(OfflineState::default()),
        }
    }

    /// Imposes `cooldown` after every action.
    #[must_use]
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// Raises a skill one level every `actions` successful uses.
    #[must_use]
    pub fn with_leveling(mut self, actions: u32) -> Self {
        self.actions_per_level = Some(actions.max(1));
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, OfflineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a character. Max HP is derived from its level and loadout;
    /// a zero HP snapshot starts at full health.
    pub fn add_character(&self, mut character: Character) {
        self.refresh_max_hp(&mut character);
        if character.hp <= 0 {
            character.hp = character.max_hp;
        }
        self.lock()
            .characters
            .insert(character.name.clone(), character);
    }

    pub fn set_bank(&self, items: impl IntoIterator<Item = ItemStack>, gold: u32) {
        let mut state = self.lock();
        state.bank = items
            .into_iter()
            .filter(|stack| stack.quantity > 0)
            .map(|stack| (stack.code, stack.quantity))
            .collect();
        state.bank_gold = gold;
    }

    /// Tasks the tasks master hands out, in rotation.
    pub fn set_task_offers(&self, kind: TaskKind, offers: Vec<ItemStack>) {
        self.lock().task_offers.insert(kind, offers);
    }

    /// Makes the next action of `name` fail with `error`. Queued failures are
    /// consumed in order.
    pub fn fail_next(&self, name: &str, error: ClientError) {
        self.lock()
            .failures
            .entry(name.to_owned())
            .or_default()
            .push_back(error);
    }

    pub fn character_snapshot(&self, name: &str) -> Option<Character> {
        self.lock().characters.get(name).cloned()
    }

    pub fn bank_quantity(&self, code: &str) -> u32 {
        self.lock().bank.get(code).copied().unwrap_or(0)
    }

    /// Names of the actions `name` performed successfully, oldest first.
    pub fn actions(&self, name: &str) -> Vec<&'static str> {
        self.lock().log.get(name).cloned().unwrap_or_default()
    }

    fn refresh_max_hp(&self, character: &mut Character) {
        let fighter = Fighter::from_loadout(
            character.level,
            &character.equipment,
            self.world.data(),
            self.simulator.tuning(),
        );
        character.max_hp = fighter.max_hp;
        character.hp = character.hp.min(character.max_hp);
    }

    /// Runs one action against a copy of the character, committing the copy
    /// only when the action succeeded.
    fn act<F>(&self, name: &str, action: &'static str, apply: F) -> ClientResult<ActionResponse>
    where
        F: FnOnce(&mut OfflineState, &mut Character) -> ClientResult<Produced>,
    {
        let mut state = self.lock();
        if let Some(error) = state.failures.get_mut(name).and_then(VecDeque::pop_front) {
            tracing::debug!(target: "runtime::offline", character = name, action, %error, "injected failure");
            return Err(error);
        }

        let mut character = state
            .characters
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("character {name}")))?;
        let now = Utc::now();
        let remaining = character.cooldown_remaining(now);
        if !remaining.is_zero() {
            return Err(ClientError::OnCooldown(remaining));
        }

        let produced = apply(&mut *state, &mut character)?;
        character.cooldown_expiration = if self.cooldown.is_zero() {
            None
        } else {
            chrono::Duration::from_std(self.cooldown)
                .ok()
                .map(|cooldown| now + cooldown)
        };
        state.characters.insert(name.to_owned(), character.clone());
        state.log.entry(name.to_owned()).or_default().push(action);
        tracing::trace!(target: "runtime::offline", character = name, action, "action applied");

        let mut response = ActionResponse::new(character, self.cooldown);
        response.drops = produced.drops;
        response.fight = produced.fight;
        Ok(response)
    }

    /// Content on the character's tile, live events included.
    fn content_at(&self, position: &Position) -> Vec<MapContent> {
        let mut found: Vec<MapContent> = self
            .world
            .data()
            .tiles()
            .iter()
            .filter(|tile| tile.position == *position)
            .filter_map(|tile| tile.content.clone())
            .collect();
        found.extend(
            self.world
                .active_events(Utc::now())
                .into_iter()
                .filter(|event| event.position == *position)
                .map(|event| event.content),
        );
        found
    }

    fn require(&self, character: &Character, kind: ContentKind, code: Option<&str>) -> ClientResult<String> {
        self.content_at(&character.position)
            .into_iter()
            .find(|content| content.kind == kind && code.is_none_or(|code| content.code == code))
            .map(|content| content.code)
            .ok_or_else(|| {
                ClientError::NotFound(format!(
                    "no {kind:?} {} at {}",
                    code.unwrap_or_default(),
                    character.position
                ))
            })
    }

    /// Counts a successful use of `skill`, levelling up when due.
    fn train(&self, state: &mut OfflineState, character: &mut Character, skill: Skill) {
        let Some(every) = self.actions_per_level else {
            return;
        };
        let progress = state
            .experience
            .entry((character.name.clone(), skill))
            .or_default();
        *progress += 1;
        if *progress < every {
            return;
        }
        *progress = 0;
        match skill {
            Skill::Combat => {
                character.level += 1;
                self.refresh_max_hp(character);
            }
            other => *character.skills.entry(other).or_insert(1) += 1,
        }
        tracing::debug!(
            target: "runtime::offline",
            character = %character.name,
            skill = skill.as_str(),
            level = character.skill_level(skill),
            "level up"
        );
    }

    fn take_from_inventory(character: &mut Character, code: &str, quantity: u32) -> ClientResult<()> {
        let held = character.held(code);
        if held < quantity {
            return Err(ClientError::InsufficientResource(format!(
                "{code}: holding {held}, need {quantity}"
            )));
        }
        character.inventory.remove(code, quantity);
        Ok(())
    }

    fn put_in_inventory(character: &mut Character, code: &str, quantity: u32) -> ClientResult<()> {
        if !character.inventory.can_hold(code, quantity) {
            return Err(ClientError::AtCapacity(format!(
                "no room for {quantity} {code}"
            )));
        }
        character.inventory.add(code, quantity);
        Ok(())
    }

    fn pick_task(&self, state: &mut OfflineState, character: &Character, kind: TaskKind) -> Option<ItemStack> {
        if let Some(offers) = state.task_offers.get(&kind).filter(|offers| !offers.is_empty()) {
            let offers = offers.clone();
            let turn = state
                .handed_out
                .entry((character.name.clone(), kind))
                .or_default();
            let offer = offers[*turn % offers.len()].clone();
            *turn += 1;
            return Some(offer);
        }

        let data = self.world.data();
        let code = match kind {
            TaskKind::Monsters => data
                .monsters()
                .filter(|monster| monster.level <= character.level)
                .max_by(|a, b| a.level.cmp(&b.level).then_with(|| b.code.cmp(&a.code)))
                .map(|monster| monster.code.clone()),
            TaskKind::Items => data
                .resources()
                .filter(|resource| character.skill_level(resource.skill) >= resource.level)
                .filter_map(|resource| resource.primary_drop().map(|drop| (resource.level, drop.code.clone())))
                .min()
                .map(|(_, code)| code),
        }?;
        Some(ItemStack::new(code, DEFAULT_TASK_TOTAL))
    }

    fn fight_here(&self, state: &mut OfflineState, character: &mut Character) -> ClientResult<Produced> {
        let code = self.require(character, ContentKind::Monster, None)?;
        let monster = self
            .world
            .data()
            .monster(&code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("monster {code}")))?;
        if character.inventory.is_full() {
            return Err(ClientError::AtCapacity("inventory is full".to_owned()));
        }

        let player = Fighter::from_loadout(
            character.level,
            &character.equipment,
            self.world.data(),
            self.simulator.tuning(),
        )
        .with_hp(character.hp);
        let pass = self
            .simulator
            .run_pass(&player, &Fighter::from_monster(&monster), 0);
        let won = pass.winner == Winner::Player;

        consume_utilities(character, pass.potions_used);
        let mut produced = Produced::default();
        if won {
            character.hp = pass.player_hp.max(1);
            for drop in &monster.drops {
                if let Some(stack) = state.roll(&character.name, &monster.code, drop)
                    && character.inventory.can_hold(&stack.code, stack.quantity)
                {
                    character.inventory.add(&stack.code, stack.quantity);
                    produced.drops.push(stack);
                }
            }
            if let Some(task) = character.task.as_mut()
                && task.kind == TaskKind::Monsters
                && task.code == monster.code
                && !task.is_finished()
            {
                task.progress += 1;
            }
            self.train(state, character, Skill::Combat);
        } else {
            character.hp = 1;
        }

        tracing::debug!(
            target: "runtime::offline",
            character = %character.name,
            monster = %monster.code,
            won,
            turns = pass.turns,
            "fight resolved"
        );
        produced.fight = Some(FightReport {
            monster: monster.code,
            won,
            turns: pass.turns,
        });
        Ok(produced)
    }

    fn gather_here(&self, state: &mut OfflineState, character: &mut Character) -> ClientResult<Produced> {
        let code = self.require(character, ContentKind::Resource, None)?;
        let resource = self
            .world
            .data()
            .resource(&code)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("resource {code}")))?;
        if character.skill_level(resource.skill) < resource.level {
            return Err(ClientError::InsufficientSkill(format!(
                "{} needs {} {}",
                resource.code, resource.skill, resource.level
            )));
        }
        if character.inventory.is_full() {
            return Err(ClientError::AtCapacity("inventory is full".to_owned()));
        }

        let mut produced = Produced::default();
        for drop in &resource.drops {
            if let Some(stack) = state.roll(&character.name, &resource.code, drop)
                && character.inventory.can_hold(&stack.code, stack.quantity)
            {
                character.inventory.add(&stack.code, stack.quantity);
                produced.drops.push(stack);
            }
        }
        self.train(state, character, resource.skill);
        Ok(produced)
    }
}

/// Removes the potions a fight used, first utility slot first.
fn consume_utilities(character: &mut Character, mut used: u32) {
    for slot in [Slot::Utility1, Slot::Utility2] {
        if used == 0 {
            return;
        }
        let Some(item) = character.equipment.get(slot).cloned() else {
            continue;
        };
        let spent = item.quantity.min(used);
        used -= spent;
        let left = item.quantity - spent;
        character
            .equipment
            .set(slot, (left > 0).then(|| EquippedItem::new(item.code, left)));
    }
}

#[async_trait]
impl GameClient for OfflineClient {
    async fn character(&self, name: &str) -> ClientResult<Character> {
        self.character_snapshot(name)
            .ok_or_else(|| ClientError::NotFound(format!("character {name}")))
    }

    async fn bank_items(&self) -> ClientResult<BankContents> {
        let state = self.lock();
        Ok(BankContents {
            items: state
                .bank
                .iter()
                .map(|(code, quantity)| ItemStack::new(code.clone(), *quantity))
                .collect(),
            gold: state.bank_gold,
        })
    }

    async fn move_to(&self, name: &str, position: Position) -> ClientResult<ActionResponse> {
        self.act(name, "move", |_, character| {
            if position.layer != character.position.layer {
                return Err(ClientError::Generic(format!(
                    "{position} is on another layer"
                )));
            }
            character.position = position;
            Ok(Produced::default())
        })
    }

    async fn transition(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "transition", |_, character| {
            let code = self.require(character, ContentKind::Transition, None)?;
            let layer = Layer::from_code(&code)
                .ok_or_else(|| ClientError::NotFound(format!("layer {code}")))?;
            character.position.layer = layer;
            Ok(Produced::default())
        })
    }

    async fn fight(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "fight", |state, character| self.fight_here(state, character))
    }

    async fn gather(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "gather", |state, character| self.gather_here(state, character))
    }

    async fn craft(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse> {
        self.act(name, "craft", |state, character| {
            let recipe = self
                .world
                .data()
                .recipe(code)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("recipe for {code}")))?;
            self.require(character, ContentKind::Workshop, Some(recipe.skill.as_str()))?;
            if character.skill_level(recipe.skill) < recipe.level {
                return Err(ClientError::InsufficientSkill(format!(
                    "{code} needs {} {}",
                    recipe.skill, recipe.level
                )));
            }
            for ingredient in &recipe.items {
                let needed = ingredient.quantity * quantity;
                if character.held(&ingredient.code) < needed {
                    return Err(ClientError::InsufficientResource(format!(
                        "{}: need {needed}",
                        ingredient.code
                    )));
                }
            }
            for ingredient in &recipe.items {
                character
                    .inventory
                    .remove(&ingredient.code, ingredient.quantity * quantity);
            }
            let made = recipe.quantity.max(1) * quantity;
            Self::put_in_inventory(character, code, made)?;
            for _ in 0..quantity {
                self.train(state, character, recipe.skill);
            }
            Ok(Produced {
                drops: vec![ItemStack::new(code, made)],
                fight: None,
            })
        })
    }

    async fn rest(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "rest", |_, character| {
            character.hp = character.max_hp;
            Ok(Produced::default())
        })
    }

    async fn equip(
        &self,
        name: &str,
        code: &str,
        slot: Slot,
        quantity: u32,
    ) -> ClientResult<ActionResponse> {
        self.act(name, "equip", |_, character| {
            let item = self
                .world
                .data()
                .item(code)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("item {code}")))?;
            if item.kind.slot_kind() != Some(slot.kind()) {
                return Err(ClientError::Generic(format!("{code} does not fit {slot}")));
            }
            if item.level > character.level
                || item
                    .conditions
                    .iter()
                    .any(|gate| character.skill_level(gate.skill) < gate.level)
            {
                return Err(ClientError::InsufficientSkill(format!(
                    "{code} requirements not met"
                )));
            }
            let stacked = match character.equipment.get(slot) {
                Some(current) if current.code == code && slot.kind().is_stackable() => {
                    current.quantity
                }
                Some(current) => {
                    return Err(ClientError::Generic(format!(
                        "{slot} already holds {}",
                        current.code
                    )));
                }
                None => 0,
            };
            let quantity = if slot.kind().is_stackable() { quantity.max(1) } else { 1 };
            Self::take_from_inventory(character, code, quantity)?;
            character
                .equipment
                .equip(slot, EquippedItem::new(code, stacked + quantity));
            self.refresh_max_hp(character);
            Ok(Produced::default())
        })
    }

    async fn unequip(&self, name: &str, slot: Slot, quantity: u32) -> ClientResult<ActionResponse> {
        self.act(name, "unequip", |_, character| {
            let current = character
                .equipment
                .get(slot)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(format!("nothing in {slot}")))?;
            let removed = if slot.kind().is_stackable() {
                quantity.clamp(1, current.quantity)
            } else {
                1
            };
            Self::put_in_inventory(character, &current.code, removed)?;
            let left = current.quantity - removed;
            character
                .equipment
                .set(slot, (left > 0).then(|| EquippedItem::new(current.code, left)));
            self.refresh_max_hp(character);
            Ok(Produced::default())
        })
    }

    async fn use_item(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse> {
        self.act(name, "use_item", |_, character| {
            let restore = self
                .world
                .data()
                .item(code)
                .ok_or_else(|| ClientError::NotFound(format!("item {code}")))?
                .effect(EffectKind::Restore);
            Self::take_from_inventory(character, code, quantity)?;
            let healed = restore.saturating_mul(quantity as i32);
            character.hp = character.hp.saturating_add(healed).min(character.max_hp);
            Ok(Produced::default())
        })
    }

    async fn deposit_item(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse> {
        self.act(name, "deposit_item", |state, character| {
            self.require(character, ContentKind::Bank, None)?;
            Self::take_from_inventory(character, code, quantity)?;
            *state.bank.entry(code.to_owned()).or_default() += quantity;
            Ok(Produced::default())
        })
    }

    async fn withdraw_item(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse> {
        self.act(name, "withdraw_item", |state, character| {
            self.require(character, ContentKind::Bank, None)?;
            let stocked = state.bank.get(code).copied().unwrap_or(0);
            if stocked < quantity {
                return Err(ClientError::NotFound(format!(
                    "bank holds {stocked} {code}, need {quantity}"
                )));
            }
            Self::put_in_inventory(character, code, quantity)?;
            if stocked == quantity {
                state.bank.remove(code);
            } else {
                state.bank.insert(code.to_owned(), stocked - quantity);
            }
            Ok(Produced::default())
        })
    }

    async fn deposit_gold(&self, name: &str, amount: u32) -> ClientResult<ActionResponse> {
        self.act(name, "deposit_gold", |state, character| {
            self.require(character, ContentKind::Bank, None)?;
            if character.gold < amount {
                return Err(ClientError::InsufficientResource(format!(
                    "holding {} gold, need {amount}",
                    character.gold
                )));
            }
            character.gold -= amount;
            state.bank_gold += amount;
            Ok(Produced::default())
        })
    }

    async fn withdraw_gold(&self, name: &str, amount: u32) -> ClientResult<ActionResponse> {
        self.act(name, "withdraw_gold", |state, character| {
            self.require(character, ContentKind::Bank, None)?;
            if state.bank_gold < amount {
                return Err(ClientError::InsufficientResource(format!(
                    "bank holds {} gold, need {amount}",
                    state.bank_gold
                )));
            }
            state.bank_gold -= amount;
            character.gold += amount;
            Ok(Produced::default())
        })
    }

    async fn npc_buy(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse> {
        self.act(name, "npc_buy", |_, character| {
            let npc = self.require(character, ContentKind::Npc, None)?;
            let price = self
                .world
                .data()
                .npc(&npc)
                .and_then(|npc| npc.buy_price(code))
                .ok_or_else(|| ClientError::NotFound(format!("{npc} does not sell {code}")))?;
            let cost = price.saturating_mul(quantity);
            if character.gold < cost {
                return Err(ClientError::InsufficientResource(format!(
                    "{quantity} {code} cost {cost} gold"
                )));
            }
            Self::put_in_inventory(character, code, quantity)?;
            character.gold -= cost;
            Ok(Produced::default())
        })
    }

    async fn npc_sell(&self, name: &str, code: &str, quantity: u32) -> ClientResult<ActionResponse> {
        self.act(name, "npc_sell", |_, character| {
            let npc = self.require(character, ContentKind::Npc, None)?;
            let price = self
                .world
                .data()
                .npc(&npc)
                .and_then(|npc| npc.sell_price(code))
                .ok_or_else(|| ClientError::NotFound(format!("{npc} does not buy {code}")))?;
            Self::take_from_inventory(character, code, quantity)?;
            character.gold += price.saturating_mul(quantity);
            Ok(Produced::default())
        })
    }

    async fn task_new(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "task_new", |state, character| {
            let master = self.require(character, ContentKind::TasksMaster, None)?;
            let kind = match master.as_str() {
                "items" => TaskKind::Items,
                _ => TaskKind::Monsters,
            };
            if let Some(task) = &character.task {
                return Err(ClientError::Generic(format!("already tasked with {}", task.code)));
            }
            let offer = self
                .pick_task(state, character, kind)
                .ok_or_else(|| ClientError::NotFound(format!("no {master} task available")))?;
            character.task = Some(TaskProgress {
                code: offer.code,
                kind,
                progress: 0,
                total: offer.quantity.max(1),
            });
            Ok(Produced::default())
        })
    }

    async fn task_trade(
        &self,
        name: &str,
        code: &str,
        quantity: u32,
    ) -> ClientResult<ActionResponse> {
        self.act(name, "task_trade", |_, character| {
            self.require(character, ContentKind::TasksMaster, Some(TaskKind::Items.as_str()))?;
            let remaining = match &character.task {
                Some(task) if task.kind == TaskKind::Items && task.code == code => task.remaining(),
                _ => return Err(ClientError::NotFound(format!("no items task for {code}"))),
            };
            if quantity > remaining {
                return Err(ClientError::Generic(format!(
                    "task only needs {remaining} more {code}"
                )));
            }
            Self::take_from_inventory(character, code, quantity)?;
            if let Some(task) = character.task.as_mut() {
                task.progress += quantity;
            }
            Ok(Produced::default())
        })
    }

    async fn task_complete(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "task_complete", |_, character| {
            let task = character
                .task
                .clone()
                .ok_or_else(|| ClientError::NotFound("no task in progress".to_owned()))?;
            self.require(character, ContentKind::TasksMaster, Some(task.kind.as_str()))?;
            if !task.is_finished() {
                return Err(ClientError::Generic(format!(
                    "task {} at {}/{}",
                    task.code, task.progress, task.total
                )));
            }
            Self::put_in_inventory(character, TASKS_COIN, TASK_REWARD_COINS)?;
            character.gold += TASK_REWARD_GOLD;
            character.task = None;
            Ok(Produced {
                drops: vec![ItemStack::new(TASKS_COIN, TASK_REWARD_COINS)],
                fight: None,
            })
        })
    }

    async fn task_cancel(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "task_cancel", |_, character| {
            let task = character
                .task
                .clone()
                .ok_or_else(|| ClientError::NotFound("no task in progress".to_owned()))?;
            self.require(character, ContentKind::TasksMaster, Some(task.kind.as_str()))?;
            Self::take_from_inventory(character, TASKS_COIN, TASK_CANCEL_COST)?;
            character.task = None;
            Ok(Produced::default())
        })
    }

    async fn task_exchange(&self, name: &str) -> ClientResult<ActionResponse> {
        self.act(name, "task_exchange", |_, character| {
            self.require(character, ContentKind::TasksMaster, None)?;
            Self::take_from_inventory(character, TASKS_COIN, TASK_EXCHANGE_COST)?;
            character.gold += EXCHANGE_REWARD_GOLD;
            Ok(Produced::default())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{
        Equipment, GameData, ItemDefinition, ItemKind, MapTile, MonsterDefinition, Recipe,
        ResourceDefinition,
    };

    fn tile(id: u32, x: i32, kind: ContentKind, code: &str) -> MapTile {
        MapTile {
            map_id: id,
            position: Position::new(x, 0),
            content: Some(MapContent {
                kind,
                code: code.into(),
            }),
        }
    }

    fn client() -> OfflineClient {
        let data = GameData::new(
            vec![
                ItemDefinition::new("copper_ore", 1, ItemKind::Resource),
                ItemDefinition::new("copper_bar", 1, ItemKind::Resource).with_recipe(Recipe {
                    skill: Skill::Mining,
                    level: 1,
                    quantity: 1,
                    items: vec![ItemStack::new("copper_ore", 2)],
                }),
                ItemDefinition::new("feather", 1, ItemKind::Resource),
                ItemDefinition::new("wooden_stick", 1, ItemKind::Weapon)
                    .with_effect(EffectKind::AttackEarth, 10),
            ],
            vec![MonsterDefinition::new("chicken", 1, 20).with_drop("feather", 2, 1)],
            vec![ResourceDefinition::new("copper_rocks", Skill::Mining, 1).with_drop("copper_ore", 1, 1)],
            vec![
                tile(1, 1, ContentKind::Resource, "copper_rocks"),
                tile(2, 2, ContentKind::Workshop, "mining"),
                tile(3, 3, ContentKind::Bank, "bank"),
                tile(4, 4, ContentKind::Monster, "chicken"),
            ],
            vec![],
        );
        let client = OfflineClient::new(WorldState::new(data));
        let mut alice = Character::new("alice", 1);
        alice.equipment = Equipment::builder().item(Slot::Weapon, "wooden_stick").build();
        client.add_character(alice);
        client
    }

    #[tokio::test]
    async fn gathering_and_crafting_follow_the_recipe() {
        let client = client();
        client.move_to("alice", Position::new(1, 0)).await.unwrap();
        for _ in 0..4 {
            let response = client.gather("alice").await.unwrap();
            assert_eq!(response.dropped("copper_ore"), 1);
        }
        client.move_to("alice", Position::new(2, 0)).await.unwrap();
        let response = client.craft("alice", "copper_bar", 2).await.unwrap();

        assert_eq!(response.character.held("copper_bar"), 2);
        assert_eq!(response.character.held("copper_ore"), 0);
    }

    #[tokio::test]
    async fn actions_are_checked_against_the_tile() {
        let client = client();
        let error = client.gather("alice").await.unwrap_err();
        assert!(matches!(error, ClientError::NotFound(_)));
        assert!(client.actions("alice").is_empty());
    }

    #[tokio::test]
    async fn drops_follow_a_fixed_schedule() {
        let client = client();
        client.move_to("alice", Position::new(4, 0)).await.unwrap();
        let first = client.fight("alice").await.unwrap();
        let second = client.fight("alice").await.unwrap();

        assert!(first.fight.as_ref().is_some_and(|report| report.won));
        assert_eq!(first.dropped("feather"), 0);
        assert_eq!(second.dropped("feather"), 1);
    }

    #[tokio::test]
    async fn bank_round_trip_keeps_totals() {
        let client = client();
        client.set_bank([ItemStack::new("copper_ore", 5)], 10);
        client.move_to("alice", Position::new(3, 0)).await.unwrap();

        client.withdraw_item("alice", "copper_ore", 3).await.unwrap();
        assert_eq!(client.bank_quantity("copper_ore"), 2);
        let error = client.withdraw_item("alice", "copper_ore", 3).await.unwrap_err();
        assert!(matches!(error, ClientError::NotFound(_)));

        let response = client.deposit_item("alice", "copper_ore", 3).await.unwrap();
        assert_eq!(response.character.held("copper_ore"), 0);
        assert_eq!(client.bank_quantity("copper_ore"), 5);
    }

    #[tokio::test]
    async fn injected_failures_are_consumed_in_order() {
        let client = client();
        client.fail_next("alice", ClientError::AlreadyInProgress);
        assert_eq!(
            client.rest("alice").await.unwrap_err(),
            ClientError::AlreadyInProgress
        );
        assert!(client.rest("alice").await.is_ok());
    }

    #[tokio::test]
    async fn cooldowns_reject_early_actions() {
        let client = client().with_cooldown(Duration::from_secs(30));
        client.rest("alice").await.unwrap();
        let error = client.rest("alice").await.unwrap_err();
        assert!(matches!(error, ClientError::OnCooldown(_)));
    }
}

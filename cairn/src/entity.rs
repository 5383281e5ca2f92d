//! Map objects: structures, treasure and creatures.
//!
//! Every object on a dungeon map is a [`MapObject`]: a closed [`Kind`], the
//! shared presentation/collision data, and a [`Body`] carrying the
//! kind-specific state. Behaviour is selected by matching on the body, not
//! through dynamic dispatch.

use rand::{Rng, RngExt};

/// Index of an object in the map's storage.
pub type EntityId = usize;

// ---------------------------------------------------------------------------
// Tuning
// ---------------------------------------------------------------------------

pub const PLAYER_HP: i32 = 60;
pub const PLAYER_OFFENSE: i32 = 10;
pub const PLAYER_DEFENSE: i32 = 3;

/// Boss stats are rolled as if the dungeon were this many levels deeper.
pub const BOSS_LEVEL_BONUS: i32 = 2;
/// Max-HP reward for defeating a boss.
pub const BOSS_MAX_HP_BONUS: i32 = 10;
/// Base damage of a trap, multiplied by the dungeon level.
pub const TRAP_DAMAGE: i32 = 6;
/// Base price of a merchant's wares, multiplied by the dungeon level.
pub const TRADE_PRICE: u32 = 25;
/// Max HP sold by a merchant per trade.
pub const TRADE_MAX_HP: i32 = 5;

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// The three damage types. Each throw of the minigame maps onto one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatKind {
    Physical,
    Ranged,
    Magical,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Physical, StatKind::Ranged, StatKind::Magical];

    pub fn name(self) -> &'static str {
        match self {
            StatKind::Physical => "physical",
            StatKind::Ranged => "ranged",
            StatKind::Magical => "magical",
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            StatKind::Physical => 0,
            StatKind::Ranged => 1,
            StatKind::Magical => 2,
        }
    }
}

/// One value per [`StatKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats([i32; 3]);

impl Stats {
    pub const fn new(physical: i32, ranged: i32, magical: i32) -> Self {
        Self([physical, ranged, magical])
    }

    pub const fn uniform(v: i32) -> Self {
        Self([v, v, v])
    }

    #[inline]
    pub fn get(&self, kind: StatKind) -> i32 {
        self.0[kind.index()]
    }

    #[inline]
    pub fn set(&mut self, kind: StatKind, value: i32) {
        self.0[kind.index()] = value;
    }
}

// ---------------------------------------------------------------------------
// Kinds and events
// ---------------------------------------------------------------------------

/// Broad grouping of map objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Structure,
    Treasure,
    Creature,
}

/// Every archetype that can appear on a map. The numeric ids are stable and
/// are what savefile layouts store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Abyss,
    Floor,
    Entrance,
    Exit,
    Trap,
    Fountain,
    Merchant,
    Chest,
    Gold,
    Enemy,
    Boss,
    Player,
}

pub const EID_ABYSS: i32 = 0;
pub const EID_FLOOR: i32 = 1;
pub const EID_ENTRANCE: i32 = 2;
pub const EID_EXIT: i32 = 3;
pub const EID_TRAP: i32 = 4;
pub const EID_FOUNTAIN: i32 = 5;
pub const EID_MERCHANT: i32 = 6;
pub const EID_CHEST: i32 = 7;
pub const EID_GOLD: i32 = 8;
pub const EID_ENEMY: i32 = 9;
pub const EID_BOSS: i32 = 10;
pub const EID_PLAYER: i32 = 11;

impl Kind {
    pub fn id(self) -> i32 {
        match self {
            Kind::Abyss => EID_ABYSS,
            Kind::Floor => EID_FLOOR,
            Kind::Entrance => EID_ENTRANCE,
            Kind::Exit => EID_EXIT,
            Kind::Trap => EID_TRAP,
            Kind::Fountain => EID_FOUNTAIN,
            Kind::Merchant => EID_MERCHANT,
            Kind::Chest => EID_CHEST,
            Kind::Gold => EID_GOLD,
            Kind::Enemy => EID_ENEMY,
            Kind::Boss => EID_BOSS,
            Kind::Player => EID_PLAYER,
        }
    }

    pub fn from_id(id: i32) -> Option<Kind> {
        let kind = match id {
            EID_ABYSS => Kind::Abyss,
            EID_FLOOR => Kind::Floor,
            EID_ENTRANCE => Kind::Entrance,
            EID_EXIT => Kind::Exit,
            EID_TRAP => Kind::Trap,
            EID_FOUNTAIN => Kind::Fountain,
            EID_MERCHANT => Kind::Merchant,
            EID_CHEST => Kind::Chest,
            EID_GOLD => Kind::Gold,
            EID_ENEMY => Kind::Enemy,
            EID_BOSS => Kind::Boss,
            EID_PLAYER => Kind::Player,
            _ => return None,
        };
        Some(kind)
    }

    pub fn category(self) -> Category {
        match self {
            Kind::Chest | Kind::Gold => Category::Treasure,
            Kind::Enemy | Kind::Boss | Kind::Player => Category::Creature,
            _ => Category::Structure,
        }
    }

    /// Filler kinds are shared by every tile that shows them.
    pub fn is_filler(self) -> bool {
        matches!(self, Kind::Abyss | Kind::Floor)
    }
}

/// What happens when an actor steps onto an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ExitMap,
    Lockpick,
    Loot,
    Fight,
    Trap,
    Heal,
    Trade,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::ExitMap => "exit_map",
            EventKind::Lockpick => "lockpick",
            EventKind::Loot => "loot",
            EventKind::Fight => "fight",
            EventKind::Trap => "trap",
            EventKind::Heal => "heal",
            EventKind::Trade => "trade",
        }
    }
}

// ---------------------------------------------------------------------------
// Treasure
// ---------------------------------------------------------------------------

/// A lootable container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Treasure {
    pub locked: bool,
    reward: u32,
    /// Sprite shown once the reward has been taken.
    pub empty_sprite: Option<&'static str>,
    /// Remove the object from the map once emptied.
    pub destroy_on_empty: bool,
}

impl Treasure {
    pub fn new(reward: u32, locked: bool) -> Self {
        Self {
            locked,
            reward,
            empty_sprite: None,
            destroy_on_empty: false,
        }
    }

    /// Stored reward, without taking it.
    pub fn reward(&self) -> u32 {
        self.reward
    }

    /// Take the stored reward. Returns it once, then 0 forever after.
    pub fn get_reward(&mut self) -> u32 {
        std::mem::take(&mut self.reward)
    }

    pub fn is_empty(&self) -> bool {
        self.reward == 0
    }
}

// ---------------------------------------------------------------------------
// Creature
// ---------------------------------------------------------------------------

/// What a creature is on the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Player { money: u32 },
    Enemy { boss: bool, bounty: u32 },
}

/// Anything with hit points that can fight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Creature {
    hp: i32,
    max_hp: i32,
    pub offense: Stats,
    pub defense: Stats,
    pub role: Role,
}

impl Creature {
    pub fn new(max_hp: i32, offense: Stats, defense: Stats, role: Role) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            hp: max_hp,
            max_hp,
            offense,
            defense,
            role,
        }
    }

    /// A fresh player with the starting stats and no money.
    pub fn player() -> Self {
        Self::new(
            PLAYER_HP,
            Stats::uniform(PLAYER_OFFENSE),
            Stats::uniform(PLAYER_DEFENSE),
            Role::Player { money: 0 },
        )
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    /// Restore a saved hit point value, clamped to `[0, max_hp]`.
    pub fn set_hp(&mut self, hp: i32) {
        self.hp = hp.clamp(0, self.max_hp);
    }

    /// Restore a saved max HP. Current HP is clamped to it.
    pub fn set_max_hp(&mut self, max_hp: i32) {
        self.max_hp = max_hp.max(1);
        self.hp = self.hp.min(self.max_hp);
    }

    pub fn is_player(&self) -> bool {
        matches!(self.role, Role::Player { .. })
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.role, Role::Enemy { boss: true, .. })
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Apply `amount` raw damage of type `kind`. The matching defense is
    /// subtracted first; neither the damage nor HP go below zero. Returns
    /// the HP actually lost, which is 0 for a creature that is already dead.
    pub fn damage(&mut self, amount: i32, kind: StatKind) -> i32 {
        if self.is_dead() {
            return 0;
        }
        let effective = (amount - self.defense.get(kind)).max(0);
        let dealt = effective.min(self.hp);
        self.hp -= dealt;
        dealt
    }

    /// Heal up to max HP. Returns the HP actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn increase_max_hp(&mut self, amount: i32) {
        self.max_hp += amount.max(0);
    }

    pub fn increase_offense(&mut self, kind: StatKind, amount: i32) {
        self.offense.set(kind, self.offense.get(kind) + amount.max(0));
    }

    pub fn increase_defense(&mut self, kind: StatKind, amount: i32) {
        self.defense.set(kind, self.defense.get(kind) + amount.max(0));
    }

    /// Roll fresh HP and stats for dungeon depth `multiplier`.
    ///
    /// This is the game's difficulty curve: every value grows linearly with
    /// the multiplier, with a random spread that also widens with depth.
    pub fn give_random_stats(&mut self, rng: &mut impl Rng, multiplier: i32) {
        let m = multiplier.max(1);
        self.max_hp = 10 + 6 * m + rng.random_range(0..=4 * m);
        self.hp = self.max_hp;
        for kind in StatKind::ALL {
            self.offense.set(kind, 4 + 2 * m + rng.random_range(0..=2 * m));
            self.defense.set(kind, 1 + m + rng.random_range(0..=m));
        }
    }

    pub fn money(&self) -> u32 {
        match self.role {
            Role::Player { money } => money,
            Role::Enemy { .. } => 0,
        }
    }

    pub fn add_money(&mut self, amount: u32) {
        if let Role::Player { money } = &mut self.role {
            *money = money.saturating_add(amount);
        }
    }

    pub fn set_money(&mut self, amount: u32) {
        if let Role::Player { money } = &mut self.role {
            *money = amount;
        }
    }

    /// Spend `amount` if the creature can afford it.
    pub fn spend_money(&mut self, amount: u32) -> bool {
        match &mut self.role {
            Role::Player { money } if *money >= amount => {
                *money -= amount;
                true
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// MapObject
// ---------------------------------------------------------------------------

/// Kind-specific state of a map object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Structure,
    Treasure(Treasure),
    Creature(Creature),
}

/// An object stored in a dungeon map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapObject {
    kind: Kind,
    obstacle: bool,
    description: String,
    affix: Option<String>,
    inspected: bool,
    sprite: Option<&'static str>,
    player_event: Option<EventKind>,
    enemy_event: Option<EventKind>,
    pub body: Body,
}

impl MapObject {
    fn new(kind: Kind, description: &str, sprite: &'static str, body: Body) -> Self {
        Self {
            kind,
            obstacle: false,
            description: description.to_string(),
            affix: None,
            inspected: false,
            sprite: Some(sprite),
            player_event: None,
            enemy_event: None,
            body,
        }
    }

    fn with_player_event(mut self, event: EventKind) -> Self {
        self.player_event = Some(event);
        self
    }

    fn with_enemy_event(mut self, event: EventKind) -> Self {
        self.enemy_event = Some(event);
        self
    }

    // -------------------------------------------------------------------
    // Factories
    // -------------------------------------------------------------------

    pub fn abyss() -> Self {
        let mut o = Self::new(Kind::Abyss, "Endless darkness.", "abyss", Body::Structure);
        o.obstacle = true;
        o
    }

    pub fn floor() -> Self {
        Self::new(Kind::Floor, "Cold stone floor.", "floor", Body::Structure)
    }

    pub fn entrance() -> Self {
        Self::new(Kind::Entrance, "The way you came in.", "entrance", Body::Structure)
    }

    pub fn exit() -> Self {
        Self::new(Kind::Exit, "Stairs leading deeper.", "exit", Body::Structure)
            .with_player_event(EventKind::ExitMap)
    }

    pub fn trap() -> Self {
        Self::new(Kind::Trap, "A suspicious flagstone.", "trap", Body::Structure)
            .with_player_event(EventKind::Trap)
    }

    pub fn fountain() -> Self {
        Self::new(Kind::Fountain, "A bubbling fountain.", "fountain", Body::Structure)
            .with_player_event(EventKind::Heal)
    }

    pub fn merchant() -> Self {
        Self::new(Kind::Merchant, "A hooded merchant.", "merchant", Body::Structure)
            .with_player_event(EventKind::Trade)
    }

    /// A chest holding a level-scaled reward, locked half of the time.
    pub fn chest(rng: &mut impl Rng, level: i32) -> Self {
        let level = level.max(1) as u32;
        let reward = rng.random_range(10..=30) * level;
        Self::chest_with_reward(reward, rng.random_bool(0.5))
    }

    pub fn chest_with_reward(reward: u32, locked: bool) -> Self {
        let mut treasure = Treasure::new(reward, locked);
        treasure.empty_sprite = Some("chest_open");
        let mut o = Self::new(Kind::Chest, "A wooden chest.", "chest", Body::Treasure(treasure));
        o.sync_treasure_state();
        o
    }

    /// A pile of coins that disappears once picked up.
    pub fn gold(rng: &mut impl Rng, level: i32) -> Self {
        let level = level.max(1) as u32;
        let mut treasure = Treasure::new(rng.random_range(5..=15) * level, false);
        treasure.destroy_on_empty = true;
        let mut o = Self::new(Kind::Gold, "Scattered coins.", "gold", Body::Treasure(treasure));
        o.sync_treasure_state();
        o
    }

    pub fn player() -> Self {
        Self::new(
            Kind::Player,
            "That's you.",
            "player",
            Body::Creature(Creature::player()),
        )
        .with_enemy_event(EventKind::Fight)
    }

    pub fn enemy(rng: &mut impl Rng, level: i32) -> Self {
        let level = level.max(1);
        let bounty = (5 * level + rng.random_range(0..=5 * level)) as u32;
        let mut creature = Creature::new(
            1,
            Stats::default(),
            Stats::default(),
            Role::Enemy {
                boss: false,
                bounty,
            },
        );
        creature.give_random_stats(rng, level);
        Self::new(Kind::Enemy, "A lurking monster.", "enemy", Body::Creature(creature))
            .with_player_event(EventKind::Fight)
    }

    pub fn boss(rng: &mut impl Rng, level: i32) -> Self {
        let level = level.max(1);
        let bounty = 3 * (5 * level + rng.random_range(0..=5 * level)) as u32;
        let mut creature = Creature::new(
            1,
            Stats::default(),
            Stats::default(),
            Role::Enemy { boss: true, bounty },
        );
        creature.give_random_stats(rng, level + BOSS_LEVEL_BONUS);
        let doubled = creature.max_hp() * 2;
        creature.set_max_hp(doubled);
        creature.set_hp(doubled);
        Self::new(Kind::Boss, "A hulking guardian.", "boss", Body::Creature(creature))
            .with_player_event(EventKind::Fight)
    }

    /// Instantiate any non-filler kind. Filler kinds get fresh instances here
    /// too; map generation shares them instead.
    pub fn spawn(kind: Kind, rng: &mut impl Rng, level: i32) -> Self {
        match kind {
            Kind::Abyss => Self::abyss(),
            Kind::Floor => Self::floor(),
            Kind::Entrance => Self::entrance(),
            Kind::Exit => Self::exit(),
            Kind::Trap => Self::trap(),
            Kind::Fountain => Self::fountain(),
            Kind::Merchant => Self::merchant(),
            Kind::Chest => Self::chest(rng, level),
            Kind::Gold => Self::gold(rng, level),
            Kind::Enemy => Self::enemy(rng, level),
            Kind::Boss => Self::boss(rng, level),
            Kind::Player => Self::player(),
        }
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn category(&self) -> Category {
        self.kind.category()
    }

    pub fn is_obstacle(&self) -> bool {
        self.obstacle
    }

    pub fn sprite(&self) -> Option<&'static str> {
        self.sprite
    }

    pub fn player_collision_event(&self) -> Option<EventKind> {
        self.player_event
    }

    pub fn enemy_collision_event(&self) -> Option<EventKind> {
        self.enemy_event
    }

    pub fn set_player_collision_event(&mut self, event: Option<EventKind>) {
        self.player_event = event;
    }

    pub fn set_enemy_collision_event(&mut self, event: Option<EventKind>) {
        self.enemy_event = event;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_sprite(&mut self, sprite: Option<&'static str>) {
        self.sprite = sprite;
    }

    pub fn is_inspected(&self) -> bool {
        self.inspected
    }

    pub fn inspect(&mut self) {
        self.inspected = true;
    }

    /// The description, plus the affix once the object has been inspected.
    /// Creatures report their health as their affix.
    pub fn describe(&self) -> String {
        if !self.inspected {
            return self.description.clone();
        }
        match (&self.body, &self.affix) {
            (Body::Creature(c), _) => {
                format!("{} ({}/{} HP)", self.description, c.hp(), c.max_hp())
            }
            (_, Some(affix)) => format!("{} {}", self.description, affix),
            (_, None) => self.description.clone(),
        }
    }

    pub fn creature(&self) -> Option<&Creature> {
        match &self.body {
            Body::Creature(c) => Some(c),
            _ => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        match &mut self.body {
            Body::Creature(c) => Some(c),
            _ => None,
        }
    }

    pub fn treasure(&self) -> Option<&Treasure> {
        match &self.body {
            Body::Treasure(t) => Some(t),
            _ => None,
        }
    }

    // -------------------------------------------------------------------
    // Treasure state
    // -------------------------------------------------------------------

    /// Keep event binding, affix and sprite in step with the treasure.
    fn sync_treasure_state(&mut self) {
        let Body::Treasure(t) = &self.body else {
            return;
        };
        if t.is_empty() {
            self.player_event = None;
            self.affix = Some("(empty)".to_string());
            if let Some(sprite) = t.empty_sprite {
                self.sprite = Some(sprite);
            }
        } else if t.locked {
            self.player_event = Some(EventKind::Lockpick);
            self.affix = Some("(locked)".to_string());
        } else {
            self.player_event = Some(EventKind::Loot);
            self.affix = Some("(unlocked)".to_string());
        }
    }

    pub fn is_locked(&self) -> bool {
        self.treasure().is_some_and(|t| t.locked)
    }

    pub fn lock(&mut self) {
        if let Body::Treasure(t) = &mut self.body {
            t.locked = true;
        }
        self.sync_treasure_state();
    }

    pub fn unlock(&mut self) {
        if let Body::Treasure(t) = &mut self.body {
            t.locked = false;
        }
        self.sync_treasure_state();
    }

    /// Take the treasure's reward (0 for anything else or an empty one).
    pub fn take_reward(&mut self) -> u32 {
        let amount = match &mut self.body {
            Body::Treasure(t) => t.get_reward(),
            _ => return 0,
        };
        self.sync_treasure_state();
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn dummy(hp: i32, off: i32, def: i32) -> Creature {
        Creature::new(
            hp,
            Stats::uniform(off),
            Stats::uniform(def),
            Role::Enemy {
                boss: false,
                bounty: 0,
            },
        )
    }

    #[test]
    fn damage_subtracts_matching_defense() {
        let mut c = dummy(20, 5, 5);
        c.defense.set(StatKind::Magical, 1);
        assert_eq!(c.damage(10, StatKind::Physical), 5);
        assert_eq!(c.hp(), 15);
        assert_eq!(c.damage(10, StatKind::Magical), 9);
        assert_eq!(c.hp(), 6);
        // Absorbed entirely by defense.
        assert_eq!(c.damage(3, StatKind::Ranged), 0);
    }

    #[test]
    fn damage_clamps_at_zero_and_reports_hp_lost() {
        let mut c = dummy(4, 0, 0);
        assert_eq!(c.damage(10, StatKind::Physical), 4);
        assert_eq!(c.hp(), 0);
        assert!(c.is_dead());
    }

    #[test]
    fn heal_never_exceeds_max() {
        let mut c = dummy(20, 0, 0);
        c.damage(15, StatKind::Physical);
        assert_eq!(c.heal(100), 15);
        assert_eq!(c.hp(), 20);
        c.increase_max_hp(5);
        assert_eq!(c.heal(100), 5);
        assert_eq!(c.hp(), 25);
    }

    #[test]
    fn random_stats_grow_with_multiplier() {
        let mut rng = StdRng::seed_from_u64(7);
        let avg = |rng: &mut StdRng, m: i32| {
            let mut total = 0;
            for _ in 0..200 {
                let mut c = dummy(1, 0, 0);
                c.give_random_stats(rng, m);
                assert_eq!(c.hp(), c.max_hp());
                total += c.max_hp() + c.offense.get(StatKind::Ranged);
            }
            total
        };
        let shallow = avg(&mut rng, 1);
        let deep = avg(&mut rng, 5);
        assert!(deep > shallow, "{deep} <= {shallow}");
    }

    #[test]
    fn money_only_for_players() {
        let mut p = MapObject::player();
        let c = p.creature_mut().unwrap();
        c.add_money(30);
        assert!(!c.spend_money(31));
        assert!(c.spend_money(30));
        assert_eq!(c.money(), 0);

        let mut e = dummy(1, 0, 0);
        e.add_money(10);
        assert_eq!(e.money(), 0);
    }

    #[test]
    fn locked_chest_exposes_lockpick_until_unlocked() {
        let mut chest = MapObject::spawn(Kind::Chest, &mut StdRng::seed_from_u64(1), 1);
        chest.lock();
        assert_eq!(chest.player_collision_event(), Some(EventKind::Lockpick));
        chest.unlock();
        assert_eq!(chest.player_collision_event(), Some(EventKind::Loot));
        assert!(chest.take_reward() > 0);
        assert_eq!(chest.player_collision_event(), None);
        assert_eq!(chest.sprite(), Some("chest_open"));
    }

    #[test]
    fn describe_reveals_affix_after_inspection() {
        let mut chest = MapObject::chest(&mut StdRng::seed_from_u64(3), 1);
        chest.lock();
        assert_eq!(chest.describe(), "A wooden chest.");
        chest.inspect();
        assert_eq!(chest.describe(), "A wooden chest. (locked)");

        let mut enemy = MapObject::enemy(&mut StdRng::seed_from_u64(3), 1);
        enemy.inspect();
        assert!(enemy.describe().ends_with(" HP)"));
    }

    #[test]
    fn kind_ids_round_trip() {
        for id in EID_ABYSS..=EID_PLAYER {
            assert_eq!(Kind::from_id(id).map(Kind::id), Some(id));
        }
        assert_eq!(Kind::from_id(99), None);
    }

    #[test]
    fn bindings_match_archetypes() {
        let mut rng = StdRng::seed_from_u64(11);
        assert!(MapObject::abyss().is_obstacle());
        assert_eq!(MapObject::exit().player_collision_event(), Some(EventKind::ExitMap));
        let p = MapObject::player();
        assert_eq!(p.player_collision_event(), None);
        assert_eq!(p.enemy_collision_event(), Some(EventKind::Fight));
        let boss = MapObject::boss(&mut rng, 1);
        assert!(boss.creature().unwrap().is_boss());
        assert_eq!(boss.player_collision_event(), Some(EventKind::Fight));
    }

    proptest! {
        #[test]
        fn prop_damage_on_dead_is_noop(hp in 1i32..200, hit in 0i32..500, again in 0i32..500) {
            let mut c = dummy(hp, 0, 0);
            c.damage(hp + hit, StatKind::Physical);
            prop_assert!(c.is_dead());
            prop_assert_eq!(c.damage(again, StatKind::Magical), 0);
            prop_assert_eq!(c.hp(), 0);
        }

        #[test]
        fn prop_hp_stays_within_bounds(
            hp in 1i32..200,
            hits in proptest::collection::vec((0i32..100, 0usize..3), 0..20),
            heal in 0i32..300,
        ) {
            let mut c = dummy(hp, 0, 2);
            for (amount, k) in hits {
                c.damage(amount, StatKind::ALL[k]);
                prop_assert!(c.hp() >= 0);
            }
            c.heal(heal);
            prop_assert!(c.hp() <= c.max_hp());
        }

        #[test]
        fn prop_reward_is_single_use(reward in 0u32..10_000, locked in any::<bool>()) {
            let mut t = Treasure::new(reward, locked);
            prop_assert_eq!(t.get_reward(), reward);
            prop_assert_eq!(t.get_reward(), 0);
        }
    }
}

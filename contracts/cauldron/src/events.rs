use soroban_sdk::{symbol_short, Address, BytesN, Env};

/// Events published by the engine
///
/// The first topic is the event name, the second the id of the record the
/// event is about.
#[derive(Clone, Debug)]
pub enum ProtocolEvent {
    Initialized { admin: Address },
    AssetAdded { asset_id: BytesN<6>, decimals: u32 },
    SeriesAdded { series_id: BytesN<6>, base_id: BytesN<6>, maturity: u64 },
    IlkApproved { series_id: BytesN<6>, ilk_id: BytesN<6>, ratio: i128 },
    SeriesMatured { series_id: BytesN<6>, rate: i128 },
    VaultBuilt { vault_id: BytesN<12>, owner: Address, series_id: BytesN<6>, ilk_id: BytesN<6> },
    VaultDestroyed { vault_id: BytesN<12> },
    VaultTweaked { vault_id: BytesN<12>, series_id: BytesN<6>, ilk_id: BytesN<6> },
    VaultTransferred { vault_id: BytesN<12>, receiver: Address },
    VaultPoured { vault_id: BytesN<12>, series_id: BytesN<6>, ilk_id: BytesN<6>, ink: i128, art: i128 },
    VaultTimestamped { vault_id: BytesN<12>, timestamp: u64 },
    Bought { vault_id: BytesN<12>, buyer: Address, ink: i128, art: i128 },
    Unwound { vault_id: BytesN<12> },
}

impl ProtocolEvent {
    /// Emit the event using Soroban's event system
    pub fn emit(&self, env: &Env) {
        match self {
            ProtocolEvent::Initialized { admin } => {
                env.events().publish((symbol_short!("init"),), admin.clone());
            }
            ProtocolEvent::AssetAdded { asset_id, decimals } => {
                env.events()
                    .publish((symbol_short!("asset"), asset_id.clone()), *decimals);
            }
            ProtocolEvent::SeriesAdded { series_id, base_id, maturity } => {
                env.events().publish(
                    (symbol_short!("series"), series_id.clone()),
                    (base_id.clone(), *maturity),
                );
            }
            ProtocolEvent::IlkApproved { series_id, ilk_id, ratio } => {
                env.events().publish(
                    (symbol_short!("approved"), series_id.clone()),
                    (ilk_id.clone(), *ratio),
                );
            }
            ProtocolEvent::SeriesMatured { series_id, rate } => {
                env.events()
                    .publish((symbol_short!("matured"), series_id.clone()), *rate);
            }
            ProtocolEvent::VaultBuilt { vault_id, owner, series_id, ilk_id } => {
                env.events().publish(
                    (symbol_short!("built"), vault_id.clone()),
                    (owner.clone(), series_id.clone(), ilk_id.clone()),
                );
            }
            ProtocolEvent::VaultDestroyed { vault_id } => {
                env.events()
                    .publish((symbol_short!("destroyed"), vault_id.clone()), ());
            }
            ProtocolEvent::VaultTweaked { vault_id, series_id, ilk_id } => {
                env.events().publish(
                    (symbol_short!("tweaked"), vault_id.clone()),
                    (series_id.clone(), ilk_id.clone()),
                );
            }
            ProtocolEvent::VaultTransferred { vault_id, receiver } => {
                env.events()
                    .publish((symbol_short!("transfer"), vault_id.clone()), receiver.clone());
            }
            ProtocolEvent::VaultPoured { vault_id, series_id, ilk_id, ink, art } => {
                env.events().publish(
                    (symbol_short!("poured"), vault_id.clone()),
                    (series_id.clone(), ilk_id.clone(), *ink, *art),
                );
            }
            ProtocolEvent::VaultTimestamped { vault_id, timestamp } => {
                env.events()
                    .publish((symbol_short!("stamped"), vault_id.clone()), *timestamp);
            }
            ProtocolEvent::Bought { vault_id, buyer, ink, art } => {
                env.events().publish(
                    (symbol_short!("bought"), vault_id.clone()),
                    (buyer.clone(), *ink, *art),
                );
            }
            ProtocolEvent::Unwound { vault_id } => {
                env.events()
                    .publish((symbol_short!("unwound"), vault_id.clone()), ());
            }
        }
    }
}

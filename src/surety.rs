//! The registry entry points.
//!
//! [`FlightSurety`] wires the Operational Switch, Funding Gate and both
//! consensus engines around one injected [`SuretyStore`]. Every mutating call
//! checks the switch first, takes the caller's identity explicitly, and
//! returns a [`Receipt`] carrying the events it produced. The same events are
//! appended to the journal for off-core consumers.

use crate::config::SuretyConfig;
use crate::consensus::{RegistrationConsensus, ResponseConsensus};
use crate::core::{Address, Amount, Error, Result};
use crate::events::{Event, EventJournal};
use crate::oracle::{FlightKey, FlightStatus, FlightStatusRequest};
use crate::registry::{AirlineInfo, FundingGate, FundingReceipt, SuretyStore};
use crate::switch::OperationalSwitch;

/// Result of a successful mutating call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt<T> {
    pub value: T,
    /// Events emitted by this call, in order
    pub events: Vec<Event>,
}

impl<T> Receipt<T> {
    /// Whether an event with this name was emitted.
    pub fn emitted(&self, name: &str) -> bool {
        self.events.iter().any(|event| event.name() == name)
    }
}

/// The flight surety registry.
pub struct FlightSurety {
    config: SuretyConfig,
    store: SuretyStore,
    switch: OperationalSwitch,
    funding: FundingGate,
    registration: RegistrationConsensus,
    responses: ResponseConsensus,
    journal: EventJournal,
}

impl FlightSurety {
    /// Create a registry with `genesis_airline` as its first member.
    pub fn new(admin: Address, genesis_airline: Address, config: SuretyConfig) -> Result<Self> {
        let store = SuretyStore::genesis(genesis_airline, config.funding.genesis_prefunded);
        Self::with_store(admin, store, config)
    }

    /// Create a registry over an existing store.
    pub fn with_store(admin: Address, store: SuretyStore, config: SuretyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            funding: FundingGate::new(config.funding.clone()),
            registration: RegistrationConsensus::new(config.registration.clone()),
            responses: ResponseConsensus::new(config.oracle.clone()),
            switch: OperationalSwitch::new(admin),
            journal: EventJournal::new(),
            store,
            config,
        })
    }

    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    pub fn store(&self) -> &SuretyStore {
        &self.store
    }

    /// Every event emitted so far.
    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }

    /// Run `op` against a staged copy of the store. The copy replaces the
    /// store only once the events are journaled, so a failed call leaves no
    /// trace.
    fn transact<T>(
        &mut self,
        op: impl FnOnce(&Self, &mut SuretyStore) -> Result<(T, Vec<Event>)>,
    ) -> Result<Receipt<T>> {
        self.switch.ensure_operational()?;
        let mut staged = self.store.clone();
        let (value, events) = op(self, &mut staged)?;
        let entries = self.journal.prepare(&events)?;
        self.store = staged;
        self.journal.commit(entries);
        Ok(Receipt { value, events })
    }

    // Operational switch

    pub fn is_operational(&self) -> bool {
        self.switch.is_operational()
    }

    pub fn set_operational_status(&mut self, value: bool, caller: Address) -> Result<Receipt<()>> {
        let mut switch = self.switch.clone();
        let events = if switch.set(value, caller)? {
            vec![Event::OperationalStatusChanged { operational: value }]
        } else {
            Vec::new()
        };
        let entries = self.journal.prepare(&events)?;
        self.switch = switch;
        self.journal.commit(entries);
        Ok(Receipt { value: (), events })
    }

    // Airlines

    /// Sponsor or vote for `candidate`.
    pub fn register_airline(&mut self, candidate: Address, caller: Address) -> Result<Receipt<()>> {
        self.transact(|surety, store| {
            let events = surety
                .registration
                .register_airline(&mut store.airlines, candidate, caller)?;
            Ok(((), events))
        })
    }

    /// Apply for membership as `caller`. Returns the assigned sequence number.
    pub fn apply_for_membership(&mut self, caller: Address) -> Result<Receipt<u64>> {
        self.transact(|surety, store| {
            let sequence_number = surety
                .registration
                .apply_for_membership(&mut store.airlines, caller)?;
            Ok((sequence_number, Vec::new()))
        })
    }

    /// Post stake for `airline`.
    pub fn post_funding(&mut self, airline: Address, amount: Amount) -> Result<Receipt<FundingReceipt>> {
        self.transact(|surety, store| {
            let receipt = surety
                .funding
                .post_funding(&mut store.airlines, airline, amount)?;
            let event = Event::Funded {
                airline,
                amount: receipt.retained,
            };
            Ok((receipt, vec![event]))
        })
    }

    /// Alias for [`FlightSurety::post_funding`] with the caller paying for itself.
    pub fn pay_airline_registration_fee(
        &mut self,
        caller: Address,
        amount: Amount,
    ) -> Result<Receipt<FundingReceipt>> {
        self.post_funding(caller, amount)
    }

    pub fn is_funded(&self, airline: &Address) -> bool {
        self.funding.is_funded(&self.store.airlines, airline)
    }

    /// Accepted airlines only.
    pub fn get_airline(&self, airline: &Address) -> Result<AirlineInfo> {
        self.store.airlines.get(airline)
    }

    /// Number of accepted airlines.
    pub fn get_airline_count(&self) -> usize {
        self.store.airlines.accepted_count()
    }

    pub fn get_airline_registration_fee(&self) -> Amount {
        self.funding.min_funding()
    }

    pub fn get_pending_votes(&self, candidate: &Address) -> usize {
        self.registration.pending_votes(&self.store.airlines, candidate)
    }

    // Oracles

    /// Register `caller` as an oracle. Returns its assigned indexes.
    pub fn register_oracle(&mut self, caller: Address, fee: Amount) -> Result<Receipt<[u8; 3]>> {
        self.transact(|surety, store| {
            let oracle = &surety.config.oracle;
            let indexes = store.oracles.register(
                caller,
                fee,
                oracle.registration_fee,
                oracle.index_space,
            )?;
            let event = Event::OracleRegistered {
                oracle: caller,
                indexes,
            };
            Ok((indexes, vec![event]))
        })
    }

    pub fn get_oracle_registration_fee(&self) -> Amount {
        self.config.oracle.registration_fee
    }

    pub fn get_oracle_indexes(&self, oracle: &Address) -> Result<[u8; 3]> {
        self.store.oracles.indexes(oracle)
    }

    pub fn oracle_count(&self) -> usize {
        self.store.oracles.len()
    }

    // Flight status

    /// Ask oracles for a flight's status. Returns the request's open index.
    pub fn request_flight_status(
        &mut self,
        caller: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<Receipt<u8>> {
        let key = FlightKey::new(airline, flight, timestamp);
        self.transact(|surety, store| {
            surety
                .responses
                .request_flight_status(&mut store.requests, caller, key)
        })
    }

    /// Report a flight's status as `oracle`. Returns the request's final
    /// status after this report, if any.
    pub fn submit_oracle_response(
        &mut self,
        oracle: Address,
        airline: Address,
        flight: &str,
        timestamp: u64,
        index: u8,
        status_code: u8,
    ) -> Result<Receipt<Option<FlightStatus>>> {
        let key = FlightKey::new(airline, flight, timestamp);
        self.transact(|surety, store| {
            let events = surety.responses.submit_response(
                &mut store.requests,
                &store.oracles,
                oracle,
                key.clone(),
                index,
                status_code,
            )?;
            let final_status = store
                .requests
                .get(&key)
                .and_then(|request| request.final_status);
            Ok((final_status, events))
        })
    }

    /// Current state of a flight status request.
    pub fn get_flight_status(
        &self,
        airline: Address,
        flight: &str,
        timestamp: u64,
    ) -> Result<&FlightStatusRequest> {
        let key = FlightKey::new(airline, flight, timestamp);
        self.store
            .requests
            .get(&key)
            .ok_or_else(|| Error::UnknownRequest(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ETHER;
    use crate::identity::Keypair;

    const FLIGHT: &str = "ND1309";
    const ARRIVAL: u64 = 1_700_000_000;

    fn accounts(n: usize) -> Vec<Address> {
        (0..n).map(|_| Keypair::generate().address()).collect()
    }

    fn surety_with(config: SuretyConfig) -> (FlightSurety, Address, Vec<Address>) {
        let admin = Keypair::generate().address();
        let airlines = accounts(6);
        let surety = FlightSurety::new(admin, airlines[0], config).unwrap();
        (surety, admin, airlines)
    }

    /// Registry with airlines[0..4] accepted and funded.
    fn four_members() -> (FlightSurety, Address, Vec<Address>) {
        let (mut surety, admin, airlines) = surety_with(SuretyConfig::default());
        for airline in &airlines[1..4] {
            surety.register_airline(*airline, airlines[0]).unwrap();
            surety.post_funding(*airline, 10 * ETHER).unwrap();
        }
        (surety, admin, airlines)
    }

    #[test]
    fn test_initial_state() {
        let (surety, _, airlines) = surety_with(SuretyConfig::default());
        assert!(surety.is_operational());
        assert_eq!(surety.get_airline_count(), 1);
        assert!(surety.is_funded(&airlines[0]));
        assert_eq!(surety.get_airline_registration_fee(), 10 * ETHER);
        assert_eq!(surety.get_oracle_registration_fee(), ETHER);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SuretyConfig::default();
        config.oracle.index_space = 1;
        let result = FlightSurety::new(Address::new([0; 20]), Address::new([1; 20]), config);
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_scenario_bootstrap_admission() {
        let (mut surety, _, a) = surety_with(SuretyConfig::default());

        let receipt = surety.register_airline(a[1], a[0]).unwrap();
        assert!(receipt.emitted("Registered"));
        assert_eq!(surety.get_airline_count(), 2);

        let result = surety.register_airline(a[2], a[1]);
        assert!(matches!(result, Err(Error::Unauthorized(_))));

        surety.pay_airline_registration_fee(a[1], 10 * ETHER).unwrap();
        surety.register_airline(a[2], a[1]).unwrap();
        assert_eq!(surety.get_airline_count(), 3);
        assert_eq!(surety.get_airline(&a[2]).unwrap().sequence_number, 3);
    }

    #[test]
    fn test_scenario_quorum_admission() {
        let (mut surety, _, a) = four_members();
        assert_eq!(surety.get_airline_count(), 4);

        let receipt = surety.register_airline(a[4], a[0]).unwrap();
        assert!(receipt.emitted("Voted"));
        assert!(!receipt.emitted("Registered"));
        assert_eq!(surety.get_airline(&a[4]), Err(Error::NotFound(a[4])));
        assert_eq!(surety.get_pending_votes(&a[4]), 1);

        let result = surety.register_airline(a[4], a[0]);
        assert!(matches!(result, Err(Error::DuplicateVote { .. })));
        assert_eq!(surety.get_pending_votes(&a[4]), 1);

        let receipt = surety.register_airline(a[4], a[1]).unwrap();
        assert!(receipt.emitted("Voted"));
        assert!(receipt.emitted("Registered"));
        assert_eq!(surety.get_airline_count(), 5);
        assert!(surety.get_airline(&a[4]).unwrap().accepted);
    }

    #[test]
    fn test_scenario_oracle_quorum() {
        let mut config = SuretyConfig::default();
        config.oracle.index_space = 3;
        let (mut surety, _, a) = surety_with(config);
        let oracles = accounts(4);
        for oracle in &oracles {
            let receipt = surety.register_oracle(*oracle, ETHER).unwrap();
            let mut indexes = receipt.value;
            indexes.sort();
            assert_eq!(indexes, [0, 1, 2]);
        }

        let index = surety
            .request_flight_status(a[0], a[0], FLIGHT, ARRIVAL)
            .unwrap()
            .value;
        let weather = FlightStatus::LateWeather.code();

        for oracle in &oracles[..2] {
            let receipt = surety
                .submit_oracle_response(*oracle, a[0], FLIGHT, ARRIVAL, index, weather)
                .unwrap();
            assert_eq!(receipt.value, None);
        }
        let receipt = surety
            .submit_oracle_response(oracles[2], a[0], FLIGHT, ARRIVAL, index, weather)
            .unwrap();
        assert_eq!(receipt.value, Some(FlightStatus::LateWeather));
        assert!(receipt.emitted("FlightStatusInfo"));

        let late = surety.submit_oracle_response(
            oracles[3],
            a[0],
            FLIGHT,
            ARRIVAL,
            index,
            FlightStatus::OnTime.code(),
        );
        assert!(matches!(late, Err(Error::RequestClosed { .. })));

        let request = surety.get_flight_status(a[0], FLIGHT, ARRIVAL).unwrap();
        assert_eq!(request.final_status, Some(FlightStatus::LateWeather));
        assert!(!request.is_open);
    }

    #[test]
    fn test_switch_blocks_mutations() {
        let (mut surety, admin, a) = surety_with(SuretyConfig::default());
        let oracle = Keypair::generate().address();

        let receipt = surety.set_operational_status(false, admin).unwrap();
        assert!(receipt.emitted("OperationalStatusChanged"));

        assert_eq!(surety.register_airline(a[1], a[0]), Err(Error::NotOperational));
        assert_eq!(surety.apply_for_membership(a[1]), Err(Error::NotOperational));
        assert_eq!(surety.post_funding(a[0], 10 * ETHER), Err(Error::NotOperational));
        assert_eq!(surety.register_oracle(oracle, ETHER), Err(Error::NotOperational));
        assert_eq!(
            surety.request_flight_status(a[0], a[0], FLIGHT, ARRIVAL),
            Err(Error::NotOperational)
        );
        assert_eq!(
            surety.submit_oracle_response(oracle, a[0], FLIGHT, ARRIVAL, 0, 10),
            Err(Error::NotOperational)
        );

        // Queries keep working.
        assert_eq!(surety.get_airline_count(), 1);
        assert!(surety.get_airline(&a[0]).is_ok());
        assert!(!surety.is_operational());

        surety.set_operational_status(true, admin).unwrap();
        assert!(surety.register_airline(a[1], a[0]).is_ok());
    }

    #[test]
    fn test_switch_admin_only() {
        let (mut surety, _, a) = surety_with(SuretyConfig::default());
        let result = surety.set_operational_status(false, a[0]);
        assert!(matches!(result, Err(Error::Unauthorized(_))));
        assert!(surety.is_operational());
    }

    #[test]
    fn test_queries_are_idempotent() {
        let (surety, _, a) = four_members();
        let first = surety.get_airline(&a[2]).unwrap();
        let second = surety.get_airline(&a[2]).unwrap();
        assert_eq!(first, second);

        let journal_len = surety.journal().len();
        surety.is_operational();
        surety.get_airline_count();
        assert_eq!(surety.journal().len(), journal_len);
    }

    #[test]
    fn test_failed_calls_leave_no_trace() {
        let (mut surety, _, a) = four_members();
        let journal_len = surety.journal().len();

        let _ = surety.register_airline(a[5], a[5]);
        let _ = surety.post_funding(a[5], 10 * ETHER);
        let _ = surety.post_funding(a[1], ETHER);
        let _ = surety.get_oracle_indexes(&a[5]);

        assert_eq!(surety.journal().len(), journal_len);
        assert!(surety.store().airlines.record(&a[5]).is_none());
        assert_eq!(surety.get_pending_votes(&a[5]), 0);
    }

    #[test]
    fn test_late_failure_discards_staged_changes() {
        let (mut surety, _, a) = four_members();
        let journal_len = surety.journal().len();

        let result: Result<Receipt<()>> = surety.transact(|_, store| {
            store.airlines.insert_applied(a[5]);
            Err(Error::SerializationError("journal unavailable".into()))
        });

        assert!(result.is_err());
        assert!(surety.store().airlines.record(&a[5]).is_none());
        assert_eq!(surety.journal().len(), journal_len);
    }

    #[test]
    fn test_oracle_registration() {
        let (mut surety, _, _) = surety_with(SuretyConfig::default());
        let oracle = Keypair::generate().address();

        let result = surety.register_oracle(oracle, ETHER / 2);
        assert!(matches!(result, Err(Error::InsufficientFunds { .. })));
        assert_eq!(surety.get_oracle_indexes(&oracle), Err(Error::NotRegistered(oracle)));

        let indexes = surety.register_oracle(oracle, ETHER).unwrap().value;
        assert_eq!(surety.get_oracle_indexes(&oracle).unwrap(), indexes);
        assert_eq!(
            surety.register_oracle(oracle, ETHER),
            Err(Error::AlreadyRegistered(oracle))
        );
        assert_eq!(surety.oracle_count(), 1);
    }

    #[test]
    fn test_journal_records_events() {
        let (mut surety, _, a) = four_members();
        surety.register_airline(a[4], a[0]).unwrap();
        surety.register_airline(a[4], a[1]).unwrap();

        let journal = surety.journal();
        assert_eq!(journal.by_name("Registered").len(), 4);
        assert_eq!(journal.by_name("Funded").len(), 3);
        assert_eq!(journal.by_name("Voted").len(), 2);
        assert!(journal.verify().unwrap().valid);
    }

    #[test]
    fn test_unknown_flight_status() {
        let (surety, _, a) = surety_with(SuretyConfig::default());
        let result = surety.get_flight_status(a[0], FLIGHT, ARRIVAL);
        assert!(matches!(result, Err(Error::UnknownRequest(_))));
    }

    #[test]
    fn test_with_injected_store() {
        let admin = Address::new([9; 20]);
        let genesis = Address::new([1; 20]);
        let store = SuretyStore::genesis(genesis, false);
        let mut surety = FlightSurety::with_store(admin, store, SuretyConfig::default()).unwrap();

        assert!(!surety.is_funded(&genesis));
        let result = surety.register_airline(Address::new([2; 20]), genesis);
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }
}

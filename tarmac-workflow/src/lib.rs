//! Cross-entity rules and their notification side-effects. Registries keep
//! each entity's invariants local; everything that spans two entities or
//! posts to a board runs through the coordinator, so each step of a
//! multi-role handoff is an explicit action by the role that owns it.

use serde::Serialize;
use tarmac_domain::{
    BagLocation, Board, Message, MessagePayload, Passenger, PassengerStatus, Priority, Role,
};
use tarmac_messaging::{MessageBus, MessageDraft};
use tarmac_registry::{
    ActorContext, BagRegistry, FlightRegistry, GateReassignment, PassengerRegistry, RegistryError,
};
use tarmac_store::{SharedStore, StoreError};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("message {id} not found on {board:?} board")]
    MessageNotFound { board: Board, id: Uuid },

    #[error("message {id} does not carry a {expected} payload")]
    UnexpectedPayload { id: Uuid, expected: &'static str },

    #[error("passenger {0} still has bags; remove them before processing the removal request")]
    PassengerStillHasBags(String),
}

/// Result of a departure-readiness check. Never mutates flight status; gate
/// staff act on it separately.
#[derive(Debug, Clone, Serialize)]
pub struct DepartureReadiness {
    pub flight_id: String,
    pub flight_number: String,
    pub ready: bool,
    pub passengers_not_boarded: Vec<String>,
    pub bags_not_loaded: Vec<String>,
}

#[derive(Clone)]
pub struct Coordinator {
    flights: FlightRegistry,
    passengers: PassengerRegistry,
    bags: BagRegistry,
    bus: MessageBus,
}

impl Coordinator {
    pub fn new(store: SharedStore) -> Self {
        Self {
            flights: FlightRegistry::new(store.clone()),
            passengers: PassengerRegistry::new(store.clone()),
            bags: BagRegistry::new(store.clone()),
            bus: MessageBus::new(store),
        }
    }

    /// Check a passenger in. Airline staff may only act on flights of their
    /// own airline.
    pub fn check_in(
        &self,
        actor: &ActorContext,
        passenger_id: &str,
    ) -> Result<Passenger, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::AirlineStaff])?;
        self.require_flight_scope_of(actor, passenger_id)?;
        Ok(self.passengers.check_in(passenger_id, actor.staff_id)?)
    }

    /// Board a passenger. The bag-at-gate precondition is enforced inside
    /// the registry, atomically with the status write.
    pub fn board_passenger(
        &self,
        actor: &ActorContext,
        passenger_id: &str,
    ) -> Result<Passenger, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::GateStaff])?;
        self.require_flight_scope_of(actor, passenger_id)?;
        Ok(self.passengers.board(passenger_id, actor.staff_id)?)
    }

    /// Reassign a gate and alert ground staff, whose routing assumptions the
    /// old gate just invalidated.
    pub fn change_gate(
        &self,
        actor: &ActorContext,
        flight_id: &str,
        new_gate: &str,
    ) -> Result<GateReassignment, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::GateStaff])?;
        let flight = self.flights.get(flight_id)?;
        actor.require_airline(&flight.airline)?;

        let reassignment = self.flights.change_gate(flight_id, new_gate)?;
        self.bus.post(
            Board::Ground,
            MessageDraft {
                author: actor.username.clone(),
                airline: Some(flight.airline),
                payload: MessagePayload::GateChange {
                    flight_id: reassignment.flight_id.clone(),
                    flight_number: reassignment.flight_number.clone(),
                    old_gate: reassignment.old_gate.clone(),
                    new_gate: reassignment.new_gate.clone(),
                },
                priority: Priority::High,
            },
        )?;
        Ok(reassignment)
    }

    /// Ground staff flag a bag during screening. First hop of the
    /// ground -> airline -> admin removal handoff.
    pub fn flag_security_violation(
        &self,
        actor: &ActorContext,
        bag_id: &str,
    ) -> Result<Message, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::GroundStaff])?;

        let bag = self
            .bags
            .update_location(bag_id, BagLocation::SecurityViolation, actor.staff_id)?;
        let passenger = self.passengers.get(&bag.passenger_id)?;
        let flight = self.flights.get(&bag.flight_id)?;

        let message = self.bus.post(
            Board::Airline,
            MessageDraft {
                author: actor.username.clone(),
                airline: Some(flight.airline),
                payload: MessagePayload::SecurityViolation {
                    bag_id: bag.id,
                    passenger_id: passenger.id,
                    ticket_number: passenger.ticket_number,
                    flight_number: flight.flight_number,
                },
                priority: Priority::High,
            },
        )?;
        Ok(message)
    }

    /// Airline staff act on a violation alert: remove the passenger's bags
    /// and escalate to the admin board. Second hop of the handoff; consumes
    /// the airline-board message.
    pub fn escalate_security_violation(
        &self,
        actor: &ActorContext,
        message_id: Uuid,
    ) -> Result<Message, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::AirlineStaff])?;

        let message =
            self.bus
                .get(Board::Airline, message_id)
                .ok_or(WorkflowError::MessageNotFound {
                    board: Board::Airline,
                    id: message_id,
                })?;
        let (passenger_id, ticket_number) = match &message.payload {
            MessagePayload::SecurityViolation {
                passenger_id,
                ticket_number,
                ..
            } => (passenger_id.clone(), ticket_number.clone()),
            _ => {
                return Err(WorkflowError::UnexpectedPayload {
                    id: message_id,
                    expected: "security_violation",
                })
            }
        };

        self.require_flight_scope_of(actor, &passenger_id)?;
        let removed = self.bags.remove_bags_for_passenger(&passenger_id)?;
        info!(
            "Escalating removal of passenger {} after clearing {} bag(s)",
            passenger_id, removed
        );

        let escalation = self.bus.post(
            Board::Admin,
            MessageDraft {
                author: actor.username.clone(),
                airline: message.airline.clone(),
                payload: MessagePayload::RemovalRequest {
                    passenger_id,
                    ticket_number,
                    reason: "security violation".to_owned(),
                },
                priority: Priority::High,
            },
        )?;
        self.bus.delete(Board::Airline, message_id)?;
        Ok(escalation)
    }

    /// The administrator processes a removal request: re-verify the
    /// passenger has no bags left, then remove them. Final hop; consumes
    /// the admin-board message.
    pub fn process_removal_request(
        &self,
        actor: &ActorContext,
        message_id: Uuid,
    ) -> Result<(), WorkflowError> {
        actor.require_role(&[Role::Admin])?;

        let message =
            self.bus
                .get(Board::Admin, message_id)
                .ok_or(WorkflowError::MessageNotFound {
                    board: Board::Admin,
                    id: message_id,
                })?;
        let passenger_id = match &message.payload {
            MessagePayload::RemovalRequest { passenger_id, .. } => passenger_id.clone(),
            _ => {
                return Err(WorkflowError::UnexpectedPayload {
                    id: message_id,
                    expected: "removal_request",
                })
            }
        };

        let passenger = self.passengers.get(&passenger_id)?;
        if !passenger.bag_ids.is_empty() {
            return Err(WorkflowError::PassengerStillHasBags(passenger_id));
        }

        self.passengers.remove_passenger(&passenger_id)?;
        self.bus.delete(Board::Admin, message_id)?;
        Ok(())
    }

    /// Departure readiness: every passenger boarded and every bag loaded.
    /// A ready flight is announced on the admin board; flight status is
    /// untouched either way.
    pub fn departure_readiness(
        &self,
        actor: &ActorContext,
        flight_id: &str,
    ) -> Result<DepartureReadiness, WorkflowError> {
        actor.require_role(&[Role::Admin, Role::GateStaff])?;
        let flight = self.flights.get(flight_id)?;
        actor.require_airline(&flight.airline)?;

        let passengers_not_boarded: Vec<String> = self
            .passengers
            .list_by_flight(flight_id)
            .into_iter()
            .filter(|p| p.status != PassengerStatus::Boarded)
            .map(|p| p.id)
            .collect();
        let bags_not_loaded: Vec<String> = self
            .bags
            .unloaded_bags(flight_id)
            .into_iter()
            .map(|b| b.id)
            .collect();

        let readiness = DepartureReadiness {
            flight_id: flight.id.clone(),
            flight_number: flight.flight_number.clone(),
            ready: passengers_not_boarded.is_empty() && bags_not_loaded.is_empty(),
            passengers_not_boarded,
            bags_not_loaded,
        };

        if readiness.ready {
            self.bus.post(
                Board::Admin,
                MessageDraft {
                    author: actor.username.clone(),
                    airline: Some(flight.airline),
                    payload: MessagePayload::DepartureReady {
                        flight_id: readiness.flight_id.clone(),
                        flight_number: readiness.flight_number.clone(),
                    },
                    priority: Priority::High,
                },
            )?;
        }
        Ok(readiness)
    }

    /// Acknowledge a processed message by removing it from its board.
    /// Airline-scoped actors may only consume their own airline's messages;
    /// a missing id stays a quiet no-op so concurrent sessions can race.
    pub fn acknowledge_message(
        &self,
        actor: &ActorContext,
        board: Board,
        message_id: Uuid,
    ) -> Result<(), WorkflowError> {
        if actor.role.requires_airline() {
            if let Some(message) = self.bus.get(board, message_id) {
                match message.airline.as_deref() {
                    Some(airline) => actor.require_airline(airline)?,
                    None => return Err(RegistryError::ScopeViolation.into()),
                }
            }
        }
        self.bus.delete(board, message_id)?;
        Ok(())
    }

    /// Airline-scoped actors may only touch passengers on their own
    /// airline's flights.
    fn require_flight_scope_of(
        &self,
        actor: &ActorContext,
        passenger_id: &str,
    ) -> Result<(), WorkflowError> {
        if actor.role.requires_airline() {
            let passenger = self.passengers.get(passenger_id)?;
            let flight = self.flights.get(&passenger.flight_id)?;
            actor.require_airline(&flight.airline)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tarmac_registry::{NewFlight, NewPassenger};

    struct Fixture {
        coordinator: Coordinator,
        flights: FlightRegistry,
        passengers: PassengerRegistry,
        bags: BagRegistry,
        bus: MessageBus,
        flight_id: String,
    }

    fn fixture() -> Fixture {
        let store = SharedStore::in_memory();
        let flights = FlightRegistry::new(store.clone());
        let flight = flights
            .create_flight(NewFlight {
                airline: "AA".into(),
                flight_number: "AA1234".into(),
                gate: "A12".into(),
                destination: "JFK".into(),
                departure_time: Utc::now(),
            })
            .unwrap();
        Fixture {
            coordinator: Coordinator::new(store.clone()),
            flights,
            passengers: PassengerRegistry::new(store.clone()),
            bags: BagRegistry::new(store.clone()),
            bus: MessageBus::new(store),
            flight_id: flight.id,
        }
    }

    fn actor(role: Role, airline: Option<&str>) -> ActorContext {
        ActorContext::new(
            Uuid::new_v4(),
            "staff1".into(),
            role,
            airline.map(str::to_owned),
        )
    }

    fn add_passenger(fx: &Fixture, id: &str, ticket: &str) {
        fx.passengers
            .create_passenger(NewPassenger {
                id: id.to_owned(),
                name: "Ada Lovelace".to_owned(),
                ticket_number: ticket.to_owned(),
                flight_id: fx.flight_id.clone(),
                email: None,
                phone: None,
            })
            .unwrap();
    }

    #[test]
    fn test_gate_change_alerts_ground_staff() {
        let fx = fixture();
        let admin = actor(Role::Admin, None);

        fx.coordinator.change_gate(&admin, &fx.flight_id, "B5").unwrap();

        let messages = fx.bus.list_by_board(Board::Ground);
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].priority, Priority::High);
        assert!(matches!(
            &messages[0].payload,
            MessagePayload::GateChange { old_gate, new_gate, .. }
                if old_gate == "A12" && new_gate == "B5"
        ));
    }

    #[test]
    fn test_scope_blocks_other_airline() {
        let fx = fixture();
        add_passenger(&fx, "123456", "1234567890");

        let dl_staff = actor(Role::AirlineStaff, Some("DL"));
        assert!(matches!(
            fx.coordinator.check_in(&dl_staff, "123456"),
            Err(WorkflowError::Registry(RegistryError::ScopeViolation))
        ));

        let aa_staff = actor(Role::AirlineStaff, Some("AA"));
        fx.coordinator.check_in(&aa_staff, "123456").unwrap();

        // Gate staff of another airline cannot move the gate either
        let dl_gate = actor(Role::GateStaff, Some("DL"));
        assert!(fx.coordinator.change_gate(&dl_gate, &fx.flight_id, "B5").is_err());
    }

    #[test]
    fn test_acknowledge_scoped_to_own_airline() {
        let fx = fixture();
        let alert = fx
            .bus
            .post(
                Board::Airline,
                MessageDraft {
                    author: "ground1".into(),
                    airline: Some("AA".into()),
                    payload: MessagePayload::SecurityViolation {
                        bag_id: "100001".into(),
                        passenger_id: "123456".into(),
                        ticket_number: "1234567890".into(),
                        flight_number: "AA1234".into(),
                    },
                    priority: Priority::High,
                },
            )
            .unwrap();

        // Another airline cannot consume AA's pending handoff
        let dl_staff = actor(Role::AirlineStaff, Some("DL"));
        assert!(matches!(
            fx.coordinator.acknowledge_message(&dl_staff, Board::Airline, alert.id),
            Err(WorkflowError::Registry(RegistryError::ScopeViolation))
        ));
        assert_eq!(fx.bus.list_by_board(Board::Airline).len(), 1);

        let aa_staff = actor(Role::AirlineStaff, Some("AA"));
        fx.coordinator
            .acknowledge_message(&aa_staff, Board::Airline, alert.id)
            .unwrap();
        assert!(fx.bus.list_by_board(Board::Airline).is_empty());

        // Already gone: still a no-op for any actor
        fx.coordinator
            .acknowledge_message(&aa_staff, Board::Airline, alert.id)
            .unwrap();
    }

    #[test]
    fn test_role_gating() {
        let fx = fixture();
        add_passenger(&fx, "123456", "1234567890");

        let ground = actor(Role::GroundStaff, None);
        assert!(matches!(
            fx.coordinator.check_in(&ground, "123456"),
            Err(WorkflowError::Registry(RegistryError::ScopeViolation))
        ));

        let airline = actor(Role::AirlineStaff, Some("AA"));
        assert!(fx.coordinator.board_passenger(&airline, "123456").is_err());
        assert!(fx.coordinator.process_removal_request(&airline, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_three_hop_removal() {
        let fx = fixture();
        add_passenger(&fx, "123456", "1234567890");
        let aa_staff = actor(Role::AirlineStaff, Some("AA"));
        let ground = actor(Role::GroundStaff, None);
        let admin = actor(Role::Admin, None);

        fx.coordinator.check_in(&aa_staff, "123456").unwrap();
        fx.bags.add_bag("100001", "1234567890", ground.staff_id).unwrap();
        fx.bags
            .update_location("100001", BagLocation::Security, ground.staff_id)
            .unwrap();

        // Hop 1: ground staff flag the bag
        let alert = fx.coordinator.flag_security_violation(&ground, "100001").unwrap();
        assert_eq!(fx.bus.list_by_board(Board::Airline).len(), 1);

        // Admin cannot shortcut: the removal request does not exist yet
        assert!(matches!(
            fx.coordinator.process_removal_request(&admin, alert.id),
            Err(WorkflowError::MessageNotFound { .. })
        ));

        // Hop 2: airline staff clear bags and escalate
        let escalation = fx
            .coordinator
            .escalate_security_violation(&aa_staff, alert.id)
            .unwrap();
        assert!(fx.bus.list_by_board(Board::Airline).is_empty());
        assert_eq!(fx.bus.list_by_board(Board::Admin).len(), 1);
        assert!(fx.bags.bags_by_passenger("123456").is_empty());

        // Hop 3: admin verifies and removes
        fx.coordinator.process_removal_request(&admin, escalation.id).unwrap();
        assert!(fx.passengers.get("123456").is_err());
        assert!(fx.bus.list_by_board(Board::Admin).is_empty());
        assert!(fx.flights.get(&fx.flight_id).unwrap().passenger_ids.is_empty());
    }

    #[test]
    fn test_removal_blocked_while_bags_remain() {
        let fx = fixture();
        add_passenger(&fx, "123456", "1234567890");
        let aa_staff = actor(Role::AirlineStaff, Some("AA"));
        let ground = actor(Role::GroundStaff, None);
        let admin = actor(Role::Admin, None);

        fx.coordinator.check_in(&aa_staff, "123456").unwrap();
        fx.bags.add_bag("100001", "1234567890", ground.staff_id).unwrap();

        // A removal request posted while the passenger still owns a bag
        let request = fx
            .bus
            .post(
                Board::Admin,
                MessageDraft {
                    author: "aaop1".into(),
                    airline: Some("AA".into()),
                    payload: MessagePayload::RemovalRequest {
                        passenger_id: "123456".into(),
                        ticket_number: "1234567890".into(),
                        reason: "security violation".into(),
                    },
                    priority: Priority::High,
                },
            )
            .unwrap();

        assert!(matches!(
            fx.coordinator.process_removal_request(&admin, request.id),
            Err(WorkflowError::PassengerStillHasBags(_))
        ));
        // Nothing consumed, nothing removed
        assert!(fx.passengers.get("123456").is_ok());
        assert_eq!(fx.bus.list_by_board(Board::Admin).len(), 1);
    }

    #[test]
    fn test_departure_readiness_reports_and_announces() {
        let fx = fixture();
        add_passenger(&fx, "123456", "1234567890");
        let aa_staff = actor(Role::AirlineStaff, Some("AA"));
        let gate = actor(Role::GateStaff, Some("AA"));
        let ground = actor(Role::GroundStaff, None);

        fx.coordinator.check_in(&aa_staff, "123456").unwrap();
        fx.bags.add_bag("100001", "1234567890", ground.staff_id).unwrap();

        let report = fx.coordinator.departure_readiness(&gate, &fx.flight_id).unwrap();
        assert!(!report.ready);
        assert_eq!(report.passengers_not_boarded, vec!["123456".to_owned()]);
        assert_eq!(report.bags_not_loaded, vec!["100001".to_owned()]);
        assert!(fx.bus.list_by_board(Board::Admin).is_empty());

        fx.bags
            .update_location("100001", BagLocation::Security, ground.staff_id)
            .unwrap();
        fx.bags
            .update_location("100001", BagLocation::Gate, ground.staff_id)
            .unwrap();
        fx.coordinator.board_passenger(&gate, "123456").unwrap();
        fx.bags
            .update_location("100001", BagLocation::Loaded, ground.staff_id)
            .unwrap();

        let report = fx.coordinator.departure_readiness(&gate, &fx.flight_id).unwrap();
        assert!(report.ready);

        let messages = fx.bus.list_by_board(Board::Admin);
        assert_eq!(messages.len(), 1);
        assert!(matches!(
            &messages[0].payload,
            MessagePayload::DepartureReady { flight_number, .. } if flight_number == "AA1234"
        ));
    }
}

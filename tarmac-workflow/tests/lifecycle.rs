//! End-to-end baggage lifecycle scenarios, driven the way the roles would
//! drive them: airline staff check in, ground staff move bags, gate staff
//! board, the admin processes removals.

use chrono::Utc;
use tarmac_domain::{BagLocation, Board, MessagePayload, PassengerStatus, Role};
use tarmac_messaging::MessageBus;
use tarmac_registry::{
    ActorContext, BagRegistry, FlightRegistry, NewFlight, NewPassenger, PassengerRegistry,
    RegistryError,
};
use tarmac_store::SharedStore;
use tarmac_workflow::{Coordinator, WorkflowError};
use uuid::Uuid;

struct Harness {
    coordinator: Coordinator,
    flights: FlightRegistry,
    passengers: PassengerRegistry,
    bags: BagRegistry,
    bus: MessageBus,
    flight_id: String,
    airline_staff: ActorContext,
    gate_staff: ActorContext,
    ground_staff: ActorContext,
    admin: ActorContext,
}

fn harness() -> Harness {
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

    let actor = |role: Role, airline: Option<&str>| {
        ActorContext::new(Uuid::new_v4(), "staff1".into(), role, airline.map(str::to_owned))
    };

    Harness {
        coordinator: Coordinator::new(store.clone()),
        flights,
        passengers: PassengerRegistry::new(store.clone()),
        bags: BagRegistry::new(store.clone()),
        bus: MessageBus::new(store),
        flight_id: flight.id,
        airline_staff: actor(Role::AirlineStaff, Some("AA")),
        gate_staff: actor(Role::GateStaff, Some("AA")),
        ground_staff: actor(Role::GroundStaff, None),
        admin: actor(Role::Admin, None),
    }
}

fn add_passenger(h: &Harness, id: &str, ticket: &str) {
    h.passengers
        .create_passenger(NewPassenger {
            id: id.to_owned(),
            name: "Ada Lovelace".to_owned(),
            ticket_number: ticket.to_owned(),
            flight_id: h.flight_id.clone(),
            email: Some("ada@example.com".to_owned()),
            phone: Some("5551234567".to_owned()),
        })
        .unwrap();
}

#[test]
fn clean_path_to_all_loaded() {
    let h = harness();
    add_passenger(&h, "123456", "1234567890");

    // Bags cannot be added before check-in, and nothing is created
    let early = h.bags.add_bag("100001", "1234567890", h.airline_staff.staff_id);
    assert!(matches!(early, Err(RegistryError::PassengerNotCheckedIn(_))));
    assert!(h.bags.bags_by_flight(&h.flight_id).is_empty());

    h.coordinator.check_in(&h.airline_staff, "123456").unwrap();
    let bag = h
        .bags
        .add_bag("100001", "1234567890", h.airline_staff.staff_id)
        .unwrap();
    assert_eq!(bag.location, BagLocation::CheckIn);

    h.bags
        .update_location("100001", BagLocation::Security, h.ground_staff.staff_id)
        .unwrap();
    h.bags
        .update_location("100001", BagLocation::Gate, h.ground_staff.staff_id)
        .unwrap();

    // Bag at gate, no violation: boarding succeeds
    h.coordinator.board_passenger(&h.gate_staff, "123456").unwrap();
    assert_eq!(
        h.passengers.get("123456").unwrap().status,
        PassengerStatus::Boarded
    );

    // Passenger boarded: loading succeeds
    h.bags
        .update_location("100001", BagLocation::Loaded, h.ground_staff.staff_id)
        .unwrap();
    assert!(h.bags.are_all_bags_loaded(&h.flight_id));

    // Gate staff confirm readiness; the admin board hears about it
    let report = h
        .coordinator
        .departure_readiness(&h.gate_staff, &h.flight_id)
        .unwrap();
    assert!(report.ready);
    assert_eq!(h.bus.list_by_board(Board::Admin).len(), 1);

    // The bag's audit trail covers the full path
    let bag = h.bags.get("100001").unwrap();
    let path: Vec<BagLocation> = bag.timeline.iter().map(|e| e.location).collect();
    assert_eq!(
        path,
        vec![
            BagLocation::CheckIn,
            BagLocation::Security,
            BagLocation::Gate,
            BagLocation::Loaded,
        ]
    );
}

#[test]
fn violation_path_blocks_boarding_until_removal() {
    let h = harness();
    add_passenger(&h, "123456", "1234567890");

    h.coordinator.check_in(&h.airline_staff, "123456").unwrap();
    h.bags
        .add_bag("100001", "1234567890", h.airline_staff.staff_id)
        .unwrap();
    h.bags
        .update_location("100001", BagLocation::Security, h.ground_staff.staff_id)
        .unwrap();

    // Screening flags the bag instead of clearing it
    let alert = h
        .coordinator
        .flag_security_violation(&h.ground_staff, "100001")
        .unwrap();

    // Boarding is now impossible and the passenger stays checked-in
    let blocked = h.coordinator.board_passenger(&h.gate_staff, "123456");
    assert!(matches!(
        blocked,
        Err(WorkflowError::Registry(
            RegistryError::SecurityViolationPending(_)
        ))
    ));
    assert_eq!(
        h.passengers.get("123456").unwrap().status,
        PassengerStatus::CheckedIn
    );

    // A flight with an unresolved violation can never report all-loaded
    assert!(!h.bags.are_all_bags_loaded(&h.flight_id));
    assert!(!h
        .coordinator
        .departure_readiness(&h.gate_staff, &h.flight_id)
        .unwrap()
        .ready);

    // Resolution runs through the three-hop handoff
    let escalation = h
        .coordinator
        .escalate_security_violation(&h.airline_staff, alert.id)
        .unwrap();
    assert!(matches!(
        &escalation.payload,
        MessagePayload::RemovalRequest { passenger_id, ticket_number, .. }
            if passenger_id == "123456" && ticket_number == "1234567890"
    ));

    h.coordinator
        .process_removal_request(&h.admin, escalation.id)
        .unwrap();

    // The system is clean again
    assert!(h.passengers.get("123456").is_err());
    assert!(h.bags.bags_by_flight(&h.flight_id).is_empty());
    assert!(h.flights.get(&h.flight_id).unwrap().passenger_ids.is_empty());
    assert!(h.bus.list_by_board(Board::Airline).is_empty());
    assert!(h.bus.list_by_board(Board::Admin).is_empty());

    // With zero passengers the flight itself can now be removed
    h.flights.remove_flight(&h.flight_id).unwrap();
}

#[test]
fn flight_with_passengers_cannot_be_removed() {
    let h = harness();
    add_passenger(&h, "123456", "1234567890");

    assert!(matches!(
        h.flights.remove_flight(&h.flight_id),
        Err(RegistryError::FlightHasPassengers(_))
    ));

    h.passengers.remove_passenger("123456").unwrap();
    h.flights.remove_flight(&h.flight_id).unwrap();
}

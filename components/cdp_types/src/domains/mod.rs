// CDP Domain type definitions
// Contains the event types the resource summary consumes

pub mod network;

mod alerts;
mod helpers;
mod mocks;
mod orders;

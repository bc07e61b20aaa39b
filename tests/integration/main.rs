mod bitbucket_listing;
mod fakes;
mod migrate;
mod mocks;

mod surface;
